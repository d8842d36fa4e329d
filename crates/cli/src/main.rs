use anc_core::{
    compute_window, explain, resolve_next_date, validate_requested_next, validate_reschedule,
    VitalsPayload,
};
use anc_types::{IdentifierKind, RawIdentifier};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "anc")]
#[command(about = "ANC decision support CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a raw patient identifier by shape
    Classify {
        /// Free-form identifier (numeric ID, email, or text)
        term: String,
    },
    /// Explain the GH triage flags for a vitals payload
    Explain {
        /// Age in years
        age: i32,
        /// Body-mass index
        bmi: f64,
        /// Systolic blood pressure (mmHg)
        systolic_bp: i32,
        /// Diastolic blood pressure (mmHg)
        diastolic_bp: i32,
        /// Heart rate (bpm)
        heart_rate: i32,
        /// Previous pregnancy complications
        #[arg(long)]
        previous_complications: bool,
        /// Pre-existing diabetes
        #[arg(long)]
        preexisting_diabetes: bool,
        /// Gestational diabetes
        #[arg(long)]
        gestational_diabetes: bool,
        /// Mental health comorbidity
        #[arg(long)]
        mental_health: bool,
    },
    /// Compute the allowed next-visit window from a last visit date
    Window {
        /// Last visit date (YYYY-MM-DD)
        last_visit: NaiveDate,
    },
    /// Validate (and resolve) a requested next-visit date
    NextVisit {
        /// Last visit date (YYYY-MM-DD)
        last_visit: NaiveDate,
        /// Requested next-visit date (optional)
        requested: Option<NaiveDate>,
    },
    /// Validate a reschedule against the current plan
    Reschedule {
        /// Currently planned visit date (YYYY-MM-DD)
        planned: NaiveDate,
        /// Proposed new date (YYYY-MM-DD)
        proposed: NaiveDate,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Classify { term }) => {
            let raw = RawIdentifier::new(&term);
            let kind = match raw.kind() {
                IdentifierKind::Empty => "empty",
                IdentifierKind::Numeric => "numeric ID",
                IdentifierKind::Email => "email",
                IdentifierKind::FreeText => "free text",
            };
            println!("'{}' classifies as: {}", raw, kind);
        }
        Some(Commands::Explain {
            age,
            bmi,
            systolic_bp,
            diastolic_bp,
            heart_rate,
            previous_complications,
            preexisting_diabetes,
            gestational_diabetes,
            mental_health,
        }) => {
            let payload = VitalsPayload {
                age,
                bmi,
                systolic_bp,
                diastolic_bp,
                heart_rate,
                previous_complications,
                preexisting_diabetes,
                gestational_diabetes,
                mental_health,
            };
            match payload.validate() {
                Ok(()) => {
                    let reasons = explain(&payload);
                    if reasons.is_empty() {
                        println!("No triage flags raised.");
                    } else {
                        for reason in reasons {
                            println!("- {}", reason);
                        }
                    }
                }
                Err(e) => eprintln!("Invalid payload: {}", e),
            }
        }
        Some(Commands::Window { last_visit }) => match compute_window(last_visit) {
            Ok(window) => println!(
                "Next visit window: {} to {} (inclusive)",
                window.earliest, window.latest
            ),
            Err(e) => eprintln!("Error computing window: {}", e),
        },
        Some(Commands::NextVisit {
            last_visit,
            requested,
        }) => match validate_requested_next(last_visit, requested) {
            Ok(()) => match resolve_next_date(last_visit, requested) {
                Ok(next) => println!("Next visit: {}", next),
                Err(e) => eprintln!("Error resolving next visit: {}", e),
            },
            Err(e) => eprintln!("Rejected: {}", e),
        },
        Some(Commands::Reschedule { planned, proposed }) => {
            match validate_reschedule(planned, proposed) {
                Ok(()) => println!("Reschedule to {} is allowed.", proposed),
                Err(e) => eprintln!("Rejected: {}", e),
            }
        }
        None => {
            println!("No command given. Try `anc --help`.");
        }
    }

    Ok(())
}
