use clap::{Parser, Subcommand};
use unicode_width::UnicodeWidthStr;

use ngomate::errors::PortalResult;
use ngomate::models::{
    ApiSelection, AssistanceRequest, AssistanceType, DonationPurpose, DonationRequest,
    OnboardingRequest, PaymentMethod, parse_amount,
};
use ngomate::table::GridView;

#[derive(Parser)]
#[command(name = "ngomate")]
#[command(about = "Command line client for the NGO donation and case-management portal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register an NGO with the portal
    Onboard {
        /// NGO name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Short description of the NGO
        #[arg(long, default_value = "")]
        description: String,

        /// Website URL
        #[arg(long, default_value = "")]
        website: String,

        /// Enable the donor API
        #[arg(long)]
        donor_api: bool,

        /// Enable the recipients API
        #[arg(long)]
        recipients_api: bool,

        /// Enable the volunteer API
        #[arg(long)]
        volunteer_api: bool,
    },

    /// Submit a donation
    Donate {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        /// Amount to donate (100, 500, 1000 or a custom amount)
        #[arg(long)]
        amount: String,

        /// Payment method (card, upi)
        #[arg(long, default_value = "card")]
        payment: String,

        /// Purpose (general, birthday, anniversary, memory, honor, other)
        #[arg(long, default_value = "general")]
        purpose: String,

        /// Date for birthday/anniversary (YYYY-MM-DD), name for memory/honor, text for other
        #[arg(long)]
        purpose_details: Option<String>,
    },

    /// Request medical assistance
    RequestHelp {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        /// Description of the medical condition
        #[arg(long)]
        condition: String,

        /// Assistance required (surgery, treatment, medication, other)
        #[arg(long)]
        assistance: String,
    },

    /// Print donor or recipient records as a table
    Table {
        /// View to print (donors, recipients)
        #[arg(short, long)]
        view: String,

        /// Where records come from (sample, http, csv)
        #[arg(short, long, default_value = "sample")]
        source: String,

        /// Endpoint for the http source, relative to the API URL or absolute
        #[arg(short, long)]
        endpoint: Option<String>,

        /// CSV file for the csv source
        #[arg(long)]
        csv: Option<String>,

        /// Only show records containing this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Launch the interactive dashboard
    Dashboard,
}

impl Commands {
    pub fn onboarding_request(&self) -> Option<OnboardingRequest> {
        match self {
            Commands::Onboard {
                name,
                email,
                description,
                website,
                donor_api,
                recipients_api,
                volunteer_api,
            } => Some(OnboardingRequest {
                ngo_name: name.trim().to_string(),
                email: email.trim().to_string(),
                description: description.trim().to_string(),
                website: website.trim().to_string(),
                apis: ApiSelection {
                    donor: *donor_api,
                    recipients: *recipients_api,
                    volunteer: *volunteer_api,
                },
            }),
            _ => None,
        }
    }

    pub fn donation_request(&self) -> Option<PortalResult<DonationRequest>> {
        match self {
            Commands::Donate {
                first_name,
                last_name,
                email,
                phone,
                amount,
                payment,
                purpose,
                purpose_details,
            } => Some(
                donation_terms(amount, payment, purpose, purpose_details.as_deref()).map(
                    |(amount, payment_method, purpose)| DonationRequest {
                        first_name: first_name.trim().to_string(),
                        last_name: last_name.trim().to_string(),
                        email: email.trim().to_string(),
                        phone: phone.trim().to_string(),
                        amount,
                        payment_method,
                        purpose,
                    },
                ),
            ),
            _ => None,
        }
    }

    pub fn assistance_request(&self) -> Option<PortalResult<AssistanceRequest>> {
        match self {
            Commands::RequestHelp {
                first_name,
                last_name,
                email,
                phone,
                condition,
                assistance,
            } => Some(AssistanceType::parse(assistance).map(|assistance_required| {
                AssistanceRequest {
                    first_name: first_name.trim().to_string(),
                    last_name: last_name.trim().to_string(),
                    email: email.trim().to_string(),
                    phone: phone.trim().to_string(),
                    medical_condition: condition.trim().to_string(),
                    assistance_required,
                }
            })),
            _ => None,
        }
    }
}

/// Parse the amount, payment method and purpose of a donation
fn donation_terms(
    amount: &str,
    payment: &str,
    purpose: &str,
    purpose_details: Option<&str>,
) -> PortalResult<(String, PaymentMethod, DonationPurpose)> {
    Ok((
        parse_amount(amount)?,
        PaymentMethod::parse(payment)?,
        DonationPurpose::parse(purpose, purpose_details)?,
    ))
}

/// Render a grid as left-aligned plain text columns
pub fn format_grid(grid: &GridView) -> String {
    if grid.is_loading() {
        return "Loading...".to_string();
    }

    let header = grid.header();
    let mut widths: Vec<usize> = header.iter().map(|h| h.width()).collect();
    for row in grid.rows() {
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.text.width());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{}{}", text, " ".repeat(width - text.width())))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(header.iter().map(String::as_str).collect())];
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    lines.push("-".repeat(total));
    for row in grid.rows() {
        lines.push(format_line(row.cells.iter().map(|c| c.text.as_str()).collect()));
    }
    lines.join("\n")
}
