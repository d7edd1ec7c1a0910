use colored::Colorize;
use deepscan::commands::command_argument_builder;
use deepscan::handlers::{handle_profile, handle_rule, handle_scan, init_tracing};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    let outcome = match chosen_command.subcommand() {
        Some(("scan", primary_command)) => handle_scan(primary_command, quiet).await,
        Some(("profile", primary_command)) => {
            init_tracing("warn");
            handle_profile(primary_command)
        }
        Some(("rule", primary_command)) => {
            init_tracing("warn");
            handle_rule(primary_command)
        }
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn print_banner() {
    let banner = r#"
     _                                      
  __| | ___  ___ _ __  ___  ___ __ _ _ __  
 / _` |/ _ \/ _ \ '_ \/ __|/ __/ _` | '_ \ 
| (_| |  __/  __/ |_) \__ \ (_| (_| | | | |
 \__,_|\___|\___| .__/|___/\___\__,_|_| |_|
                |_|                        "#;
    println!("{}", banner.bright_cyan());
    println!(
        "  {} {}\n",
        "multi-state accessibility scanner".bright_black(),
        env!("CARGO_PKG_VERSION").bright_black()
    );
}
