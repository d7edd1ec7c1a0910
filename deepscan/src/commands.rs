use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("deepscan")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("deepscan")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Crawl a site, walk each page through its UI states and audit every state \
                for accessibility issues.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to scan")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-p --"profile" <PROFILE>)
                        .required(false)
                        .help("Scan profile: quick, standard, deep, or QUICK, SMART, DEEP with --budgeted-profiles")
                        .default_value("standard"),
                )
                .arg(
                    arg!(--"audit-command" <CMD>)
                        .required(true)
                        .num_args(1..)
                        .allow_hyphen_values(true)
                        .help(
                            "Checker program (and its arguments) that reads page HTML on stdin and \
                        prints an axe-style JSON report",
                        ),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"no-screenshot")
                        .required(false)
                        .help("Skip the seed page screenshot")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Page navigation timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                )
                .arg(
                    arg!(--"action-timeout" <MS>)
                        .required(false)
                        .help("Timeout for each visibility check and click while exploring states, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("3000"),
                )
                .arg(
                    arg!(--"settle-delay" <MS>)
                        .required(false)
                        .help("Pause after dismissing the cookie banner, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(
                    arg!(--"audit-timeout" <SECONDS>)
                        .required(false)
                        .help("Timeout for one accessibility audit of one page state")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("60"),
                )
                .arg(budgeted_profiles_arg()),
        )
        .subcommand(
            command!("profile")
                .about("Print the crawl configuration a profile name resolves to")
                .arg(arg!(<NAME>).required(true).help("Profile name"))
                .arg(budgeted_profiles_arg()),
        )
        .subcommand(
            command!("rule")
                .about("Print how a rule id is classified")
                .arg(arg!(<RULE_ID>).required(true).help("Accessibility rule id, e.g. image-alt")),
        )
}

fn budgeted_profiles_arg() -> clap::Arg {
    arg!(--"budgeted-profiles")
        .required(false)
        .help("Resolve QUICK/SMART/DEEP to crawl budgets instead of the legacy tiers")
        .env("DEEPSCAN_BUDGETED_PROFILES")
        .action(clap::ArgAction::SetTrue)
}
