use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Hunt a username across hundreds of sites", long_about = None)]
pub struct Cli {
    /// Username to hunt for
    pub username: String,

    /// Site catalog: a local JSON file or an http(s) URL
    #[arg(long, default_value = "data.json")]
    pub catalog: String,

    /// Bounded worker pool size (default: one concurrent probe per site)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 120_u64)]
    pub timeout: u64,

    /// Output directory for the per-username results file
    #[arg(short = 'o', long, default_value = "./results")]
    pub out: String,

    /// Skip sites that cannot be verified (no [?] lines)
    #[arg(long, default_value_t = false)]
    pub no_false_positives: bool,

    /// Also sweep {username}.tld domain permutations
    #[arg(long, default_value_t = false)]
    pub domains: bool,

    /// BreachDirectory API key; enables the breach-index lookup
    #[arg(short = 'b', long)]
    pub breach_key: Option<String>,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Enable detailed debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
