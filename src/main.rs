use std::str::FromStr;

use tracing::info;

use leasehold::directory::Directory;
use leasehold::model::UnitKind;
use leasehold::rental_file;

/// How the loaded directory is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// `A`/`Any` (or unset) means no kind filter.
fn parse_kind_filter(raw: Option<String>) -> Result<Option<UnitKind>, Box<dyn std::error::Error>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("a") || s.eq_ignore_ascii_case("any") => Ok(None),
        Some(s) => Ok(Some(s.parse()?)),
    }
}

fn print_text_report(directory: &Directory) -> Result<(), Box<dyn std::error::Error>> {
    println!("Rental units:");
    for line in directory.list_rental_units() {
        println!("  {line}");
    }
    println!("\nClients:");
    for (index, client) in directory.list_clients().into_iter().enumerate() {
        println!("  {client}");
        for lease in directory.list_client_leases(index)? {
            println!("     {lease}");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let data_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("LEASEHOLD_DATA").ok())
        .ok_or("usage: leasehold <rental-file> (or set LEASEHOLD_DATA)")?;
    let output_path = std::env::var("LEASEHOLD_OUTPUT").ok();
    let format = std::env::var("LEASEHOLD_FORMAT")
        .ok()
        .map(|s| s.parse::<ReportFormat>())
        .transpose()?
        .unwrap_or(ReportFormat::Text);
    let kind_filter = parse_kind_filter(std::env::var("LEASEHOLD_KIND_FILTER").ok())?;
    let in_service_only: bool = std::env::var("LEASEHOLD_IN_SERVICE_ONLY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(false);

    info!("leasehold starting");
    info!("  data: {data_path}");
    info!("  format: {format:?}");
    info!(
        "  filter: {}{}",
        kind_filter.map_or("any".to_string(), |k| k.to_string()),
        if in_service_only { ", in service only" } else { "" }
    );

    let mut directory = Directory::new();
    rental_file::read_rental_file(&data_path, &mut directory)?;
    directory.filter_rental_units(kind_filter, in_service_only);

    match format {
        ReportFormat::Text => print_text_report(&directory)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&directory.snapshot())?),
    }

    if let Some(path) = output_path {
        rental_file::write_rental_file(&path, &directory)?;
    }
    Ok(())
}
