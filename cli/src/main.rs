mod view;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use bunkr_core::{
    default_data_dir, expand_key, parse_action, parse_args, parse_target, Config,
    FileSubjectRepository, OverviewUseCase, SubjectDto, SubjectService, TargetPercent,
};

#[derive(Parser)]
#[command(name = "bunkr")]
#[command(about = "Track class attendance and how many classes you can still skip", long_about = None)]
struct Cli {
    /// Directory holding subjects.json and config.toml (default: ~/.bunkr)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a subject (usage: add "Operating Systems" target:80)
    Add {
        /// Subject name, plus optional key:value metadata
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List all subjects with attendance and bunk hints
    List,
    /// Record an action: present, absent, lab-present, lab-absent, cancelled, lab-cancelled
    Mark {
        /// Subject name or id prefix
        subject: String,
        /// Action name (unique prefixes work, e.g. `p`, `a`, `lab-p`)
        action: String,
    },
    /// Undo the most recent action of a subject
    Undo {
        subject: String,
    },
    /// Delete a subject and its attendance record
    Remove {
        subject: String,
    },
    /// Set or clear (no value) a subject's own target percentage
    Target {
        subject: String,
        percent: Option<String>,
    },
    /// Show the recorded actions of a subject
    History {
        subject: String,
    },
    /// Show one subject in detail
    Status {
        subject: String,
        /// Also report the allowance for this target
        #[arg(long)]
        target: Option<String>,
    },
    /// Totals across all subjects and the ones below target
    Overview,
}

fn init_tracing(verbose: bool, config: &Config) {
    let filter = EnvFilter::try_from_env("BUNKR_LOG").unwrap_or_else(|_| {
        let level = if verbose {
            "debug".to_string()
        } else {
            config.logging.level.trim().to_lowercase()
        };
        EnvFilter::new(format!("bunkr_core={level},bunkr={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let config = Config::load(&data_dir)?;
    init_tracing(cli.verbose, &config);
    tracing::debug!(
        data_dir = %data_dir.display(),
        from_file = Config::exists_in(&data_dir),
        safe = %config.thresholds.safe,
        minimum = %config.thresholds.minimum,
        default_target = %config.thresholds.default_target,
        "configuration loaded"
    );

    let repo = FileSubjectRepository::subjects(Some(data_dir))?;
    let service = SubjectService::new(repo, config.thresholds);

    match cli.command {
        Some(Commands::Add { args }) => {
            let parsed = parse_args(&args);
            if parsed.name.trim().is_empty() {
                return Err(anyhow!("Subject name is required."));
            }

            let mut target = None;
            for (key, value) in parsed.metadata {
                match expand_key(&key, &["target"]) {
                    Ok(_) => target = Some(parse_target(&value)?),
                    Err(e) => println!("Warning: {}", e),
                }
            }

            let dto = service.add_subject(&parsed.name, target)?;
            println!("Subject added: {} (ID: {})", dto.name, dto.short_id);
            if dto.custom_target {
                println!("  Target: {}%", dto.target);
            }
        },
        Some(Commands::List) | None => {
            let subjects = service.list()?;
            if subjects.is_empty() {
                println!("No subjects found. Add one with `bunkr add <name>`.");
            } else {
                view::show_subjects(&subjects, service.thresholds());
            }
        },
        Some(Commands::Mark { subject, action }) => {
            let action = parse_action(&action)?;
            let dto = service.record(&subject, action)?;
            println!("{}: recorded {}", dto.name, action);
            print_summary(&dto);
        },
        Some(Commands::Undo { subject }) => {
            let before = service.find(&subject)?;
            match before.ledger.last_action() {
                Some(last) => {
                    let dto = service.undo(&subject)?;
                    println!("{}: undid {}", dto.name, last);
                    print_summary(&dto);
                },
                None => println!("{}: nothing to undo", before.name),
            }
        },
        Some(Commands::Remove { subject }) => {
            let removed = service.remove(&subject)?;
            println!("Removed {} (ID: {})", removed.name, removed.short_id());
        },
        Some(Commands::Target { subject, percent }) => {
            let target = percent.as_deref().map(parse_target).transpose()?;
            let dto = service.set_target(&subject, target)?;
            if dto.custom_target {
                println!("{}: target set to {}%", dto.name, dto.target);
            } else {
                println!("{}: using default target {}%", dto.name, dto.target);
            }
            print_summary(&dto);
        },
        Some(Commands::History { subject }) => {
            let subject = service.find(&subject)?;
            view::show_history(&subject);
        },
        Some(Commands::Status { subject, target }) => {
            let found = service.find(&subject)?;
            let dto = service.summarize(&found);
            println!("{} (ID: {})", dto.name, dto.short_id);
            print_summary(&dto);
            if let Some(t) = target {
                let t: TargetPercent = parse_target(&t)?;
                println!("  Can skip {} more at {}", found.ledger.bunk_allowance(t), t);
            }
        },
        Some(Commands::Overview) => {
            let overview = OverviewUseCase::new(&service).get_overview()?;
            view::show_overview(&overview);
        },
    }
    Ok(())
}

fn print_summary(dto: &SubjectDto) {
    println!(
        "  Attended: {}  Missed: {}  Attendance: {}%",
        dto.attended, dto.missed, dto.percent
    );
    if dto.below_target {
        println!("  Below target {}%: attend every class for now", dto.target);
    } else {
        println!("  Can skip {} more at {}%", dto.allowance, dto.target);
    }
}
