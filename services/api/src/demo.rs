use crate::infra::{day_end, day_start, parse_date};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use suburb_leads::config::AppConfig;
use suburb_leads::error::AppError;
use suburb_leads::leads::{
    LeadFilters, LeadForm, LeadRepository, LeadService, LeadServiceError, LeadStatus,
    LeadSubmission, SqliteLeadRepository, SubmissionProvenance,
};
use suburb_leads::reference::{
    agents_for_suburb, format_price_band, AgentDirectory, GeneralistPolicy, SuburbDirectory,
};

#[derive(Args, Debug)]
pub(crate) struct LeadsListArgs {
    /// Filter by status (new, contacted, closed)
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<LeadStatus>,
    /// Filter by assigned agent id
    #[arg(long)]
    pub(crate) agent: Option<String>,
    /// Filter by preferred suburb (substring match)
    #[arg(long)]
    pub(crate) suburb: Option<String>,
    /// Only leads created on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Only leads created on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

fn parse_status(raw: &str) -> Result<LeadStatus, String> {
    LeadStatus::parse(raw.trim())
        .ok_or_else(|| format!("'{raw}' is not one of: new, contacted, closed"))
}

pub(crate) fn run_leads_list(args: LeadsListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.database.unwrap_or(config.database.path);
    let store = SqliteLeadRepository::open(&path)?;

    let filters = LeadFilters {
        status: args.status,
        agent_id: args.agent,
        suburb: args.suburb,
        created_from: args.from.map(day_start),
        created_until: args.to.map(day_end),
    };
    let leads = store.list(&filters)?;

    println!("{} lead(s) in {}", leads.len(), path.display());
    for lead in leads {
        let assigned = lead.assigned_agent_id.as_deref().unwrap_or("-");
        println!(
            "{}  {}  {:<9}  {}  {}  suburbs: {}  agent: {}",
            lead.created_at.format("%Y-%m-%d %H:%M"),
            lead.id,
            lead.status.label(),
            lead.name,
            lead.phone,
            lead.preferred_suburbs.join(", "),
            assigned,
        );
    }

    Ok(())
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Suburb to match agents for
    #[arg(long, default_value = "bryanston")]
    pub(crate) suburb: String,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let suburbs = Arc::new(SuburbDirectory::load_embedded()?);
    let agents = Arc::new(AgentDirectory::load_embedded()?);
    let policy = GeneralistPolicy::default();

    println!("Suburb lead capture demo");
    match suburbs.by_slug(&args.suburb) {
        Some(suburb) => println!(
            "{}: {}",
            suburb.name,
            format_price_band(&suburb.data_points.price_band)
        ),
        None => println!(
            "'{}' is not a covered suburb; recommendations fall back to generalists",
            args.suburb
        ),
    }

    let matched = agents_for_suburb(&agents, &args.suburb, &policy);
    println!("\nRecommended agents for '{}':", args.suburb);
    for (index, agent) in matched.iter().enumerate() {
        let badge = agent
            .suburbs
            .get(&args.suburb)
            .and_then(|profile| profile.badge.as_deref())
            .unwrap_or(&agent.agency);
        println!(
            "  {}. {} ({badge}): {} sales in the last 12 months, rating {:.1}",
            index + 1,
            agent.name,
            agent.stats.recent_sales,
            agent.rating,
        );
    }

    // Capture a sample lead against a throwaway store so the demo leaves no
    // file behind.
    let preferred = if suburbs.contains(&args.suburb) {
        args.suburb.clone()
    } else {
        "bryanston".to_string()
    };
    let repository = Arc::new(SqliteLeadRepository::in_memory()?);
    let service = LeadService::new(repository.clone(), suburbs.clone(), agents.clone());

    let assigned = matched.first().map(|agent| agent.id.clone());
    let lead = service
        .submit(demo_submission(&preferred), assigned)
        .map_err(demo_error)?;

    println!("\nCaptured sample lead:");
    println!("  id:         {}", lead.id);
    println!("  name:       {}", lead.name);
    println!("  status:     {}", lead.status.label());
    println!("  suburbs:    {}", lead.preferred_suburbs.join(", "));
    println!(
        "  agent:      {}",
        lead.assigned_agent_id.as_deref().unwrap_or("-")
    );
    println!("  consent:    {} ({})", lead.consent_text_version, lead.consent_timestamp);

    let stored = repository.list(&LeadFilters::default()).map_err(AppError::from)?;
    println!("\nStore now holds {} lead(s)", stored.len());

    Ok(())
}

fn demo_submission(suburb: &str) -> LeadSubmission {
    LeadSubmission {
        form: LeadForm {
            name: "Demo Seller".to_string(),
            phone: "+27 82 000 0000".to_string(),
            email: None,
            buyer_type: "upgrading".to_string(),
            budget_range: "3-6m".to_string(),
            preferred_suburbs: vec![suburb.to_string()],
            timeline: "0-3".to_string(),
            pre_approved: "no".to_string(),
            consent_given: true,
        },
        provenance: SubmissionProvenance {
            source_url: "cli://demo".to_string(),
            user_agent: "suburb-leads-api demo".to_string(),
            ip_address: None,
        },
    }
}

fn demo_error(err: LeadServiceError) -> AppError {
    match err {
        LeadServiceError::Repository(storage) => AppError::from(storage),
        LeadServiceError::Validation(validation) => {
            AppError::Io(std::io::Error::other(validation.to_string()))
        }
    }
}
