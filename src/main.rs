use clap::Parser;
use heatnet_finder::finder::{ProximityFinder, ProximityReport};
use heatnet_finder::geo::format_coords;
use heatnet_finder::geocode::{NominatimGeocoder, NominatimOptions};
use heatnet_finder::network::StaticNetworkTable;
use heatnet_finder::recommendation::Language;
use heatnet_finder::server::{self, AppState, SharedGeocoder};
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

/// Heatnet Finder: is there a district heat network near my address?
///
/// Geocodes an address, measures the distance to the nearest known heat
/// network point and tells you whether you can connect.
///
/// Examples:
///   heatnet "Rue de la Loi 16, Bruxelles"
///   heatnet --lat 50.8464 --lon 4.3680 --lang en
///   heatnet --networks ./networks.csv "Avenue Louise 54"
///   heatnet --serve --port 8080
#[derive(Parser)]
#[command(name = "heatnet", version, about, long_about = None)]
struct Cli {
    /// Free-text address to check.
    #[arg(index = 1)]
    address: Option<String>,

    /// Latitude (-90 to 90). Skips geocoding when used with --lon.
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Network table (CSV with Nom,Lat,Long columns, or JSON).
    /// Defaults to ~/.heatnet/networks.csv.
    #[arg(long, env = "HEATNET_NETWORKS")]
    networks: Option<PathBuf>,

    /// Country filter for geocoding (ISO 3166-1 alpha-2), or "any".
    #[arg(long, env = "HEATNET_COUNTRY", default_value = "BE")]
    country: String,

    /// Nominatim search endpoint.
    #[arg(long, default_value = NominatimGeocoder::DEFAULT_ENDPOINT)]
    nominatim_url: String,

    /// Geocoder timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Message language: "fr" or "en".
    #[arg(long, default_value = "fr", value_parser = parse_language)]
    lang: Language,

    /// Print only the JSON report (no banner on stderr).
    #[arg(long)]
    json: bool,

    /// Debug: list the top-N geocoder candidates for the address.
    #[arg(long)]
    candidates: Option<usize>,

    /// Run the HTTP API instead of a one-shot check.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse()
}

fn fail(msg: impl Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.serve { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    // ── Load network table ──────────────────────────────────────

    let table_path = cli.networks.clone().unwrap_or_else(StaticNetworkTable::default_path);
    let table = StaticNetworkTable::load(&table_path).unwrap_or_else(|e| fail(e));

    // ── Geocoder ────────────────────────────────────────────────

    let country = match cli.country.trim() {
        c if c.is_empty() || c.eq_ignore_ascii_case("any") => None,
        c => Some(c.to_uppercase()),
    };
    let geocoder = NominatimGeocoder::new(NominatimOptions {
        endpoint: cli.nominatim_url.clone(),
        country,
        timeout: Duration::from_secs(cli.timeout_secs),
        ..NominatimOptions::default()
    });

    if let (Some(n), Some(address)) = (cli.candidates, cli.address.as_deref()) {
        match geocoder.search(address, n) {
            Ok(candidates) => {
                eprintln!("  Top-{} candidates for '{}':", n, address);
                for (i, c) in candidates.iter().enumerate() {
                    eprintln!("    {}. {} [{}]", i + 1, c.label(), format_coords(c.latitude, c.longitude));
                }
            }
            Err(e) => eprintln!("  Warning: --candidates failed: {}", e),
        }
    }

    let geocoder: SharedGeocoder = Box::new(geocoder);
    let finder = ProximityFinder::new(geocoder, table).with_language(cli.lang);

    // ── Serve ───────────────────────────────────────────────────

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
        if let Err(e) = runtime.block_on(server::start(&cli.host, cli.port, AppState::new(finder))) {
            fail(format!("Server error on {}:{}: {}", cli.host, cli.port, e));
        }
        return;
    }

    // ── One-shot check ──────────────────────────────────────────

    // Priority: address > --lat/--lon > error
    let report = if let Some(address) = cli.address.as_deref() {
        finder.check_address(address)
    } else if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        finder.check_coordinates(lat, lon)
    } else {
        eprintln!("Error: No address specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  heatnet \"Rue de la Loi 16, Bruxelles\"");
        eprintln!("  heatnet --lat 50.8464 --lon 4.3680");
        eprintln!("  heatnet --serve");
        std::process::exit(1);
    };
    let report = report.unwrap_or_else(|e| fail(e));

    if !cli.json {
        eprint!("{}", render_banner(&report));
    }

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn render_banner(report: &ProximityReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("  {}\n", report.location.display_line()));

    match (&report.result.nearest, report.result.distance_meters) {
        (Some(p), Some(d)) => out.push_str(&format!(
            "  \u{1F525} {} (nearest: {} at {:.0} m)\n",
            report.result.tier, p.name(), d
        )),
        _ => out.push_str(&format!("  \u{1F525} {} (network table is empty)\n", report.result.tier)),
    }

    out.push_str(&format!("\n  {}\n  {}\n\n", report.recommendation.message, report.recommendation.link));
    out
}
