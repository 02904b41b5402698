//! `tcg` - terminal front-end for the test-case generation dashboard

mod logging;
mod render;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tcg_client::{ClientConfig, Dashboard, HttpBackend, UploadRequest};
use tcg_matrix::{ComplianceFilter, ComplianceView, MatrixFilter, TimeWindow, ViewAction, ViewState};
use tcg_model::ImproveRequest;

fn cli() -> Command {
    Command::new("tcg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Test-case generation dashboard")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Backend address, e.g. http://127.0.0.1:8000"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs as JSON lines"),
        )
        .subcommand(
            Command::new("requirements")
                .about("List extracted requirements")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("matrix")
                .about("Show the traceability matrix")
                .arg(Arg::new("search").long("search").help("Substring of test case id or title"))
                .arg(Arg::new("status").long("status").help("Exact status, e.g. Passed"))
                .arg(Arg::new("compliance").long("compliance").help("Compliance tag"))
                .arg(Arg::new("highlight").long("highlight").help("Only test cases linked to this requirement"))
                .arg(Arg::new("expand").long("expand").help("Show details of one test case"))
                .arg(
                    Arg::new("with-catalog")
                        .long("with-catalog")
                        .action(ArgAction::SetTrue)
                        .help("Include requirements without test cases"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate test cases for requirements or a file")
                .arg(
                    Arg::new("requirements")
                        .num_args(0..)
                        .help("Requirement ids"),
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .conflicts_with("requirements")
                        .help("Generate for every requirement of an uploaded file"),
                ),
        )
        .subcommand(
            Command::new("improve")
                .about("Rewrite a test case description")
                .arg(Arg::new("requirement").long("requirement").required(true))
                .arg(Arg::new("tc").long("tc").required(true))
                .arg(Arg::new("input").long("input").required(true).help("Guidance for the rewrite")),
        )
        .subcommand(Command::new("push-jira").about("Push all test cases to Jira"))
        .subcommand(
            Command::new("compliance")
                .about("Show compliance metrics")
                .arg(
                    Arg::new("window")
                        .long("window")
                        .default_value("all")
                        .value_parser(value_parser!(TimeWindow))
                        .help("all, 7days, 30days, 90days or year"),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .action(ArgAction::Append)
                        .help("Keep records with any of these tags"),
                )
                .arg(
                    Arg::new("export")
                        .long("export")
                        .action(ArgAction::SetTrue)
                        .help("Write compliance_report_all_<date>.csv"),
                )
                .arg(export_dir_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("export-test-cases")
                .about("Write test_cases.csv")
                .arg(export_dir_arg()),
        )
        .subcommand(
            Command::new("upload")
                .about("Upload requirement documents and input files")
                .arg(
                    Arg::new("requirement-file")
                        .long("requirement-file")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("input-file")
                        .long("input-file")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("files").about("List uploaded files").arg(json_flag()))
        .subcommand(
            Command::new("extract")
                .about("Extract requirements from an uploaded file")
                .arg(Arg::new("file_id").required(true)),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn export_dir_arg() -> Arg {
    Arg::new("dir")
        .long("dir")
        .value_parser(value_parser!(PathBuf))
        .help("Output directory (defaults to export_dir from config)")
}

fn load_config(matches: &ArgMatches) -> Result<ClientConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = ClientConfig::load(path.map(PathBuf::as_path))
        .context("failed to load configuration")?;
    if let Some(url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(url.clone());
    }
    Ok(config)
}

fn strings(args: &ArgMatches, id: &str) -> Vec<String> {
    args.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn paths(args: &ArgMatches, id: &str) -> Vec<PathBuf> {
    args.get_many::<PathBuf>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    tracing::debug!(api_root = %config.api_root(), "resolved configuration");
    let backend = HttpBackend::new(&config).context("failed to create http client")?;
    let dashboard = Dashboard::new(backend);
    let export_dir = |args: &ArgMatches| {
        args.get_one::<PathBuf>("dir")
            .cloned()
            .unwrap_or_else(|| config.export_dir.clone())
    };

    match matches.subcommand() {
        Some(("requirements", args)) => {
            let snapshot = dashboard.load_requirements().await.context("failed to fetch requirements")?;
            if args.get_flag("json") {
                print_json(&snapshot.requirements)?;
            } else {
                println!("{}", render::requirements(&snapshot.requirements));
            }
        }
        Some(("matrix", args)) => {
            let snapshot = if args.get_flag("with-catalog") {
                dashboard.load_matrix_with_catalog().await
            } else {
                dashboard.load_matrix().await
            }
            .context("failed to fetch matrix data")?;

            let mut actions = vec![
                ViewAction::FilterStatus(args.get_one::<String>("status").cloned()),
                ViewAction::FilterCompliance(args.get_one::<String>("compliance").cloned()),
            ];
            if let Some(search) = args.get_one::<String>("search") {
                actions.push(ViewAction::Search(search.clone()));
            }
            if let Some(req) = args.get_one::<String>("highlight") {
                actions.push(ViewAction::HighlightRequirement(req.clone()));
            }
            if let Some(tc) = args.get_one::<String>("expand") {
                actions.push(ViewAction::ToggleExpanded(tc.clone()));
            }
            let state = ViewState::new().apply_all(actions);
            let visible = state.visible(&snapshot.model);

            if args.get_flag("json") {
                print_json(&visible)?;
                return Ok(());
            }
            println!("{}", render::matrix(&snapshot.model, &visible));
            if let Some(tc_id) = &state.expanded {
                match snapshot.model.test_case(tc_id) {
                    Some(tc) => println!("\n{}", render::expanded(tc)),
                    None => bail!("test case {tc_id} not found"),
                }
            }
        }
        Some(("generate", args)) => {
            if let Some(file_id) = args.get_one::<String>("file") {
                let snapshot = dashboard
                    .generate_for_file(file_id)
                    .await
                    .context("failed to generate test cases for file")?;
                println!("Generated. {} test cases loaded.", snapshot.model.test_cases().len());
                return Ok(());
            }
            let ids = strings(args, "requirements");
            let outcome = dashboard
                .generate_for_requirements(&ids)
                .await
                .context("failed to generate test cases for selected requirements")?;
            // Catalog lets newly generated cases group under their titles
            if let Err(err) = dashboard.load_requirements().await {
                tracing::warn!(error = %err, "requirement catalog unavailable");
            }
            let groups = dashboard.generation_groups(Some(&ids));
            println!(
                "Generated test cases for {} requirements.\n\n{}",
                outcome.requested,
                render::groups(&groups)
            );
        }
        Some(("improve", args)) => {
            let field = |id: &str| args.get_one::<String>(id).cloned().unwrap_or_default();
            let request = ImproveRequest::new(field("requirement"), field("tc"), field("input"));
            let response = dashboard.improve(request).await.context("failed to improve test case")?;
            if let Some(message) = &response.message {
                tracing::info!(%message, "improve");
            }
            println!("{}", response.improved_description);
        }
        Some(("push-jira", _)) => {
            let response = dashboard.push_to_jira().await.context("failed to push test cases to jira")?;
            let message = response.message.clone().unwrap_or_else(|| match response.pushed() {
                Some(n) => format!("Pushed {n} items to Jira."),
                None => "Pushed to Jira.".to_string(),
            });
            println!("{message}");
            for (req, issue) in &response.jira_map {
                println!("  {req} -> {issue}");
            }
        }
        Some(("compliance", args)) => {
            let today = chrono::Local::now().date_naive();
            if args.get_flag("export") {
                let path = dashboard
                    .export_compliance_report(&export_dir(args), today)
                    .await
                    .context("failed to export compliance report")?;
                println!("Wrote {}", path.display());
                return Ok(());
            }

            let metrics = dashboard.compliance_metrics_or_empty().await;
            let window = args.get_one::<TimeWindow>("window").copied().unwrap_or_default();
            let filter = ComplianceFilter {
                tags: strings(args, "tag"),
                window,
            };
            let view = ComplianceView::new(&metrics, filter, today);
            if args.get_flag("json") {
                print_json(&view.filtered_records())?;
            } else {
                println!("{}", render::compliance(&view));
            }
        }
        Some(("export-test-cases", args)) => {
            let path = dashboard
                .export_test_cases(&export_dir(args))
                .await
                .context("failed to export test cases")?;
            println!("Wrote {}", path.display());
        }
        Some(("upload", args)) => {
            let request = UploadRequest {
                requirement_files: paths(args, "requirement-file"),
                input_files: paths(args, "input-file"),
            };
            if request.is_empty() {
                bail!("nothing to upload: pass --requirement-file or --input-file");
            }
            let response = dashboard.upload(request).await.context("upload failed")?;
            println!("{}", response.message.as_deref().unwrap_or("Uploaded."));
            for (i, id) in response.file_ids.iter().enumerate() {
                let name = response.filenames.get(i).map_or("", String::as_str);
                println!("  {id}  {name}");
            }
        }
        Some(("files", args)) => {
            let files = dashboard.files().await.context("failed to fetch files")?;
            if args.get_flag("json") {
                print_json(&files)?;
            } else {
                println!("{}", render::files(&files));
            }
        }
        Some(("extract", args)) => {
            let file_id = args.get_one::<String>("file_id").cloned().unwrap_or_default();
            let response = dashboard
                .extract(&file_id)
                .await
                .context("requirement extraction failed")?;
            println!("{} ({} requirements)", response.message, response.requirement_count);
            println!("{}", render::requirements(&response.requirements));
        }
        _ => unreachable!("subcommand_required"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    logging::init(matches.get_flag("verbose"), matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn matrix_filters_parse() {
        let m = cli()
            .try_get_matches_from(["tcg", "matrix", "--compliance", "FDA", "--expand", "TC1", "--json"])
            .unwrap();
        let (name, args) = m.subcommand().unwrap();
        assert_eq!(name, "matrix");
        assert_eq!(args.get_one::<String>("compliance").map(String::as_str), Some("FDA"));
        assert!(args.get_flag("json"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let m = cli()
            .try_get_matches_from(["tcg", "files", "--base-url", "http://qa:8000", "-v"])
            .unwrap();
        assert!(m.get_flag("verbose"));
        assert_eq!(m.get_one::<String>("base-url").map(String::as_str), Some("http://qa:8000"));
    }

    #[test]
    fn window_values_checked() {
        assert!(cli().try_get_matches_from(["tcg", "compliance", "--window", "30days"]).is_ok());
        assert!(cli().try_get_matches_from(["tcg", "compliance", "--window", "fortnight"]).is_err());
    }

    #[test]
    fn generate_takes_many_ids() {
        let m = cli()
            .try_get_matches_from(["tcg", "generate", "R1", "R2", "R3"])
            .unwrap();
        let (_, args) = m.subcommand().unwrap();
        assert_eq!(strings(args, "requirements"), ["R1", "R2", "R3"]);
    }

    #[test]
    fn improve_requires_fields() {
        assert!(cli().try_get_matches_from(["tcg", "improve", "--tc", "TC1"]).is_err());
    }
}
