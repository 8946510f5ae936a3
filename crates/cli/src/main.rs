use clap::{ArgGroup, Parser, Subcommand};
use omrs_core::constants::DEFAULT_CONFIG_FILE;
use omrs_core::{
    list_results, ConfigOverrides, DeathRequest, Gender, NewPatient, NonEmptyText, ObsValue,
    ObservationRequest, OmrsConfig, OmrsError, OmrsResult, OpenmrsClient,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "omrs")]
#[command(about = "OpenMRS REST API client")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH", env = "OMRS_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// URL of the OpenMRS instance (a URL ending in /ws/rest/v1 is also accepted)
    #[arg(short, long, value_name = "URL", env = "OMRS_API")]
    api: Option<String>,
    /// Username for authentication to API
    #[arg(short, long, value_name = "USERNAME", env = "OMRS_USER")]
    user: Option<String>,
    /// Password for authentication to API
    #[arg(short, long, value_name = "PASSWORD", env = "OMRS_PW", hide_env_values = true)]
    pw: Option<String>,
    /// Do not print UUIDs of created resources
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find UUIDs for a patient or concepts
    #[command(group(ArgGroup::new("target").required(true).args(["patient", "concept"])))]
    Find {
        /// Return the patient's UUID
        #[arg(short, long, value_name = "IDENTIFIER")]
        patient: Option<String>,
        /// Find concept(s) by name or code
        #[arg(short, long, value_name = "CONCEPT_NAME_OR_CODE")]
        concept: Option<String>,
    },
    /// Create a patient
    Patient {
        /// Given name
        #[arg(long = "givenName", visible_alias = "given-name")]
        given_name: NonEmptyText,
        /// Family name
        #[arg(long = "familyName", visible_alias = "family-name")]
        family_name: NonEmptyText,
        /// "M" or "F" ("O" and "U" are also accepted)
        #[arg(short, long)]
        gender: Gender,
        /// Age in years
        #[arg(short, long)]
        age: u32,
    },
    /// Create an observation
    #[command(group(ArgGroup::new("obs_value").required(true).args(["value", "value_coded"])))]
    Obs {
        /// Patient identifier or UUID
        #[arg(short, long)]
        patient: String,
        /// Concept code or UUID
        #[arg(short, long)]
        code: String,
        /// Concept source for --code (default: CIEL)
        #[arg(short, long)]
        source: Option<String>,
        /// Observation date/time (default: now)
        #[arg(
            long = "obsDatetime",
            visible_alias = "obs-datetime",
            value_name = "YYYY-MM-DD[ HH:MM]"
        )]
        obs_datetime: Option<String>,
        /// Value of observation
        #[arg(short, long)]
        value: Option<String>,
        /// Coded value in "SOURCE:CODE" format (default source: CIEL)
        #[arg(long = "valueCoded", visible_alias = "value-coded", value_name = "SOURCE:CODE")]
        value_coded: Option<String>,
    },
    /// Record the death of a patient
    Died {
        /// Patient who died (identifier or UUID)
        #[arg(short, long)]
        patient: String,
        /// Date of death (default: today)
        #[arg(short = 'd', long = "deathDate", visible_alias = "death-date")]
        death_date: Option<String>,
        /// Cause of death (UUID or concept code, default: Unknown)
        #[arg(short = 'c', long = "causeOfDeath", visible_alias = "cause-of-death")]
        cause_of_death: Option<String>,
    },
    /// List locations
    Locations,
    /// List patient identifier types
    #[command(name = "identifiertypes")]
    IdentifierTypes,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let mut cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_tracing(cli.quiet) {
        eprintln!("Error initialising logging: {e:#}");
        return ExitCode::FAILURE;
    }

    let command = cli.command.take();
    exit_code(run(&cli, command).await)
}

/// Reports a failed command on stderr and maps the outcome to the process exit status.
fn exit_code(result: OmrsResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) -> anyhow::Result<()> {
    let default_level = if quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

async fn run(cli: &Cli, command: Option<Commands>) -> OmrsResult<()> {
    let Some(command) = command else {
        return Err(OmrsError::InvalidInput(
            "no command given; use 'omrs --help' for commands".into(),
        ));
    };

    let overrides = ConfigOverrides {
        api: cli.api.clone(),
        user: cli.user.clone(),
        pw: cli.pw.clone(),
    };
    let cfg = OmrsConfig::load(&cli.config, overrides)?;
    tracing::debug!(?cfg, "configuration loaded");
    let client = OpenmrsClient::new(Arc::new(cfg))?;

    match command {
        Commands::Find {
            patient: Some(patient),
            ..
        } => {
            println!("{}", client.resolve_patient(&patient).await?);
        }
        Commands::Find {
            concept: Some(concept),
            ..
        } => {
            print!("{}", list_results(&client.find_concepts(&concept).await?));
        }
        Commands::Find { .. } => unreachable!("clap requires --patient or --concept"),
        Commands::Locations => {
            print!("{}", list_results(&client.list_locations().await?));
        }
        Commands::IdentifierTypes => {
            print!("{}", list_results(&client.list_identifier_types().await?));
        }
        Commands::Patient {
            given_name,
            family_name,
            gender,
            age,
        } => {
            let registered = client
                .register_patient(&NewPatient {
                    given_name,
                    family_name,
                    gender,
                    age: Some(age),
                })
                .await?;
            if !cli.quiet {
                println!("{}", registered.patient_uuid);
            }
        }
        Commands::Obs {
            patient,
            code,
            source,
            obs_datetime,
            value,
            value_coded,
        } => {
            let value = match (value, value_coded) {
                (_, Some(coded)) => ObsValue::Coded(coded),
                (Some(raw), None) => ObsValue::Raw(raw),
                (None, None) => unreachable!("clap requires --value or --valueCoded"),
            };
            let obs = client
                .record_observation(&ObservationRequest {
                    patient,
                    code,
                    source,
                    obs_datetime,
                    value,
                })
                .await?;
            if !cli.quiet {
                println!("{obs}");
            }
        }
        Commands::Died {
            patient,
            death_date,
            cause_of_death,
        } => {
            let person = client
                .record_patient_death(&DeathRequest {
                    patient,
                    death_date,
                    cause_of_death,
                })
                .await?;
            if !cli.quiet {
                println!("{person}");
            }
        }
    }

    Ok(())
}
