use crate::infra::{parse_coordinates, parse_date, parse_time, InMemorySubmissionInbox};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use move_estimate::config::{AppConfig, EstimateConfig};
use move_estimate::error::AppError;
use move_estimate::estimate::pricing::{
    CostBreakdown, DistanceTier, MoveSizeCatalog, PriceRange, PricingPolicy, PricingPolicyKind,
    QuoteRequest,
};
use move_estimate::estimate::submission::{EstimateService, Quote};
use move_estimate::estimate::{
    calculate_distance, AddressTarget, Coordinates, EstimateWizard, FieldUpdate, MoveSize,
    MoveType, Navigation, PlaceResult,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Move size key (studio, small, medium, large, 1bed-4bed, office-small/medium/large)
    #[arg(long, default_value = "medium")]
    pub(crate) size: String,
    /// Straight-line distance in miles. Computed from --from/--to when omitted.
    #[arg(long)]
    pub(crate) distance: Option<f64>,
    /// Origin as lat,lng
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    pub(crate) from: Option<Coordinates>,
    /// Destination as lat,lng
    #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
    pub(crate) to: Option<Coordinates>,
    /// Move date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Start time (HH:MM)
    #[arg(long, value_parser = parse_time)]
    pub(crate) time: Option<NaiveTime>,
    #[arg(long)]
    pub(crate) commercial: bool,
    #[arg(long)]
    pub(crate) special_items: bool,
    #[arg(long)]
    pub(crate) packing: bool,
    #[arg(long)]
    pub(crate) storage: bool,
    /// Destination has no elevator (flat pricing only)
    #[arg(long)]
    pub(crate) no_elevator: bool,
    /// Pricing policy override (detailed or flat)
    #[arg(long)]
    pub(crate) policy: Option<String>,
    /// Rate card CSV override for the detailed policy
    #[arg(long)]
    pub(crate) rate_card: Option<PathBuf>,
    /// Print the quote as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Move date used by the walkthrough (YYYY-MM-DD). Defaults to 30 days out.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Pricing policy override (detailed or flat)
    #[arg(long)]
    pub(crate) policy: Option<String>,
    /// Skip handing the finished estimate to the submission service.
    #[arg(long)]
    pub(crate) skip_submission: bool,
}

fn estimate_config(
    policy: Option<String>,
    rate_card: Option<PathBuf>,
) -> Result<EstimateConfig, AppError> {
    let mut estimate = AppConfig::load()?.estimate;
    if let Some(raw) = policy {
        estimate.pricing_policy = PricingPolicyKind::parse(&raw)
            .ok_or_else(|| AppError::Input(format!("unknown pricing policy '{raw}'")))?;
    }
    if rate_card.is_some() {
        estimate.rate_card_path = rate_card;
    }
    Ok(estimate)
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        size,
        distance,
        from,
        to,
        date,
        time,
        commercial,
        special_items,
        packing,
        storage,
        no_elevator,
        policy,
        rate_card,
        json,
    } = args;

    let distance_miles = match (distance, from, to) {
        (Some(miles), _, _) => miles,
        (None, Some(origin), Some(destination)) => calculate_distance(origin, destination),
        _ => {
            return Err(AppError::Input(
                "provide --distance or both --from and --to".to_string(),
            ))
        }
    };
    if !distance_miles.is_finite() || distance_miles < 0.0 {
        return Err(AppError::Input(format!(
            "distance must be a non-negative number of miles (found {distance_miles})"
        )));
    }

    let (policy, catalog) = estimate_config(policy, rate_card)?.build_policy()?;
    let request = QuoteRequest {
        move_type: if commercial {
            MoveType::Commercial
        } else {
            MoveType::Residential
        },
        move_size: MoveSize::new(size),
        distance_miles,
        move_date: date.unwrap_or_else(|| Local::now().date_naive()),
        move_time: time,
        has_special_items: special_items,
        needs_packing: packing,
        needs_storage: storage,
        has_elevator: !no_elevator,
    };

    let breakdown = policy.quote(&request);
    let range = breakdown.price_range();

    if json {
        let quote = Quote {
            pricing_policy: policy.kind(),
            breakdown,
            range,
        };
        let rendered = serde_json::to_string_pretty(&quote).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    render_quote(policy.as_ref(), &catalog, &request, &breakdown, range);
    Ok(())
}

fn render_quote(
    policy: &dyn PricingPolicy,
    catalog: &MoveSizeCatalog,
    request: &QuoteRequest,
    breakdown: &CostBreakdown,
    range: PriceRange,
) {
    println!("Moving estimate ({} pricing)", policy.kind());
    println!(
        "- {} move | {} | {:.1} miles | {}{}",
        request.move_type.label(),
        catalog.label_for(&request.move_size),
        request.distance_miles,
        request.move_date,
        request
            .move_time
            .map(|time| format!(" {}", time.format("%H:%M")))
            .unwrap_or_default()
    );
    if let Some(tier) = distance_tier(policy.kind(), request.distance_miles) {
        println!("- {}", tier.label());
    }
    let lines = [
        ("Base price", breakdown.base_price),
        ("Distance", breakdown.distance_cost),
        ("Special items", breakdown.special_items_cost),
        ("Packing", breakdown.packing_cost),
        ("Storage", breakdown.storage_cost),
        ("Access", breakdown.access_cost),
        ("Time factors", breakdown.time_factors_cost),
    ];
    for (label, amount) in lines {
        if amount != 0.0 || label == "Base price" {
            println!("  {:<14} ${:>10.2}", label, amount);
        }
    }
    if breakdown.time_multiplier != 1.0 {
        println!("  Time multiplier x{:.4}", breakdown.time_multiplier);
    }
    if breakdown.type_multiplier != 1.0 {
        println!("  Type multiplier x{:.2}", breakdown.type_multiplier);
    }
    println!("  {:<14} ${:>10.2}", "Total", breakdown.total_cost);
    println!("Estimated range: ${} - ${}", range.min, range.max);
}

/// Flat quotes are priced by distance tier; detailed quotes are per mile.
fn distance_tier(kind: PricingPolicyKind, miles: f64) -> Option<DistanceTier> {
    match kind {
        PricingPolicyKind::Flat => Some(DistanceTier::for_distance(miles)),
        PricingPolicyKind::Detailed => None,
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        date,
        policy,
        skip_submission,
    } = args;

    let move_date = date.unwrap_or_else(|| Local::now().date_naive() + chrono::Duration::days(30));
    let (policy, catalog) = estimate_config(policy, None)?.build_policy()?;

    println!("Estimate wizard demo ({} pricing)", policy.kind());
    let mut wizard = EstimateWizard::new(policy.clone());

    announce(&wizard);
    wizard.update_field(FieldUpdate::MoveType(MoveType::Residential));
    report(wizard.next());

    announce(&wizard);
    report(wizard.next());
    let typed = wizard.select_address(AddressTarget::From, "1600 Pennsylvania", None);
    let superseded = wizard.select_address(AddressTarget::From, "1600 Pennsylvania Ave", None);
    let late = PlaceResult::new("1600 Pennsylvania Ave SE, Washington, DC", 38.8794, -76.9823);
    if !wizard.apply_resolved_address(typed, &late) {
        println!("  Ignored a lookup for an address that was edited again");
    }
    let origin = PlaceResult::new("1600 Pennsylvania Ave NW, Washington, DC", 38.8977, -77.0365);
    wizard.apply_resolved_address(superseded, &origin);
    let destination = PlaceResult::new("1400 S Joyce St, Arlington, VA", 38.8621, -77.0632);
    wizard.select_address(AddressTarget::To, destination.full_address.clone(), Some(&destination));
    println!(
        "  Route: {} -> {} ({} miles)",
        wizard.form().from_address,
        wizard.form().to_address,
        wizard.derived().distance
    );
    if wizard.route_in_service_area() == Some(false) {
        println!("  Route leaves the service area");
    }
    report(wizard.next());

    announce(&wizard);
    wizard.update_field(FieldUpdate::MoveSize(Some(MoveSize::small())));
    println!(
        "  Size: {}",
        wizard
            .form()
            .selected_size()
            .map(|size| catalog.label_for(size))
            .unwrap_or_default()
    );
    report(wizard.next());

    announce(&wizard);
    wizard.update_field(FieldUpdate::MoveDate(Some(move_date)));
    wizard.update_field(FieldUpdate::MoveTime(NaiveTime::from_hms_opt(8, 30, 0)));
    wizard.update_field(FieldUpdate::NeedsPacking(true));
    let derived = wizard.derived();
    println!(
        "  {} at 08:30 with packing: ${} - ${}",
        move_date, derived.min, derived.max
    );
    report(wizard.next());

    announce(&wizard);
    wizard.update_field(FieldUpdate::FullName("Jordan Rivera".to_string()));
    wizard.update_field(FieldUpdate::Email("jordan@example.com".to_string()));
    wizard.update_field(FieldUpdate::Phone("202-555-0147".to_string()));
    report(wizard.next());
    announce(&wizard);

    let Some(submission) = wizard.submission() else {
        println!("  Form incomplete; nothing to submit");
        return Ok(());
    };
    match serde_json::to_string_pretty(&submission) {
        Ok(json) => println!("  Submission payload:\n{}", json),
        Err(err) => println!("  Submission payload unavailable: {}", err),
    }

    if skip_submission {
        return Ok(());
    }

    let inbox = Arc::new(InMemorySubmissionInbox::default());
    let service = EstimateService::new(inbox.clone(), policy);
    match service.submit(submission) {
        Ok(record) => {
            let receipt = record.receipt();
            println!(
                "- Received estimate {} -> {} (${} - ${})",
                receipt.submission_id,
                receipt.status,
                receipt.estimated_cost.min,
                receipt.estimated_cost.max
            );
            println!("  Inbox now holds {} lead(s)", inbox.len());
        }
        Err(err) => println!("  Submission rejected: {}", err),
    }

    Ok(())
}

fn announce(wizard: &EstimateWizard) {
    let step = wizard.step();
    println!("\nStep {} of 6: {}", step.position(), step.label());
}

fn report(navigation: Navigation) {
    match navigation {
        Navigation::Moved { from, to } => println!("  Next: {} -> {}", from.label(), to.label()),
        Navigation::Blocked { step } => println!("  Next blocked: {} is incomplete", step.label()),
        Navigation::AtBoundary { step } => println!("  No step beyond {}", step.label()),
    }
}
