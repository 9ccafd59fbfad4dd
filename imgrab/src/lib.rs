// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{expand_output_dir, format_harvest_summary};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
   _                           __
  (_)___ ___  ____ __________ _/ /_
  / / __ `__ \/ __ `/ ___/ __ `/ __ \
 / / / / / / / /_/ / /  / /_/ / /_/ /
/_/_/ /_/ /_/\__, /_/   \__,_/_.___/
            /____/"#;
    println!("{}", banner.bright_cyan());
    println!(
        "  {} v{}\n",
        "imgrab".bright_white().bold(),
        env!("CARGO_PKG_VERSION")
    );
}
