//! End-to-end extraction tests over real files
//!
//! Builds synthetic yearbook text dumps (form-feed page delimiters) in a
//! temp directory and drives them through discovery, loading, and the full
//! pipeline, asserting on the CSV files that come out.

use dsi_extractor::app::adapters::filesystem;
use dsi_extractor::app::services::orchestrator::{Orchestrator, RunStats};
use dsi_extractor::config::Config;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const FF: &str = "\u{000C}";

fn station_page(code: &str, year: u16) -> String {
    let row = |label: &str| {
        let values: Vec<String> = (1..=12).map(|i| format!("{i},5")).collect();
        format!("{label} {}", values.join(" "))
    };
    [
        "22. Doğu Karadeniz Havzası".to_string(),
        format!("{code} TURNASUYU DERESİ - ÇAMLI KÖPRÜ"),
        "GÖZLEM SÜRESİ : 06.11.1990 - 30.09.2020".to_string(),
        "YAĞIŞ ALANI : 210,00 km2   YAKLAŞIK KOT : 404 m".to_string(),
        "41°15'30\" Doğu - 41°13'51\" Kuzey".to_string(),
        format!("{year} Su yılında 4,711 m3/sn"),
        row("Maks."),
        row("Min."),
        row("Ortalama"),
        row("LT/SN/Km2"),
        row("AKIM mm."),
        row("MİL. M3"),
        "================================".to_string(),
        format!("SU YILI ({year}) YILLIK TOPLAM AKIM 149,05 MİLYON M3 710 MM. 22,4 LT/SN/Km2"),
    ]
    .join("\n")
}

fn index_page() -> String {
    "İÇİNDEKİLER\nBölüm 1 ............ 5\nBölüm 2 ............ 9".to_string()
}

fn write_document(dir: &TempDir, name: &str, pages: &[String]) {
    std::fs::write(dir.path().join(name), pages.join(FF)).unwrap();
}

fn run_pipeline(dir: &TempDir, config: &Config) -> RunStats {
    let orchestrator = Orchestrator::new(config, CancellationToken::new()).unwrap();
    let mut totals = RunStats::new();
    for path in filesystem::discover_documents(dir.path()).unwrap() {
        let document = filesystem::load_document(&path).unwrap();
        totals.merge(&orchestrator.process_document(&document).unwrap());
    }
    orchestrator.flush().unwrap();
    totals
}

fn config(dir: &TempDir) -> Config {
    Config::default()
        .with_target_stations(["D22A093", "E14A027"])
        .with_input_dir(dir.path())
        .with_output_file(dir.path().join("out.csv"))
        .with_review_file(dir.path().join("review.csv"))
        .without_progress()
}

fn read_rows(path: &std::path::Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
    (headers, rows)
}

#[test]
fn extracts_records_across_documents_with_dedup() {
    let dir = tempfile::tempdir().unwrap();
    write_document(
        &dir,
        "dsi_2015.txt",
        &[
            index_page(),
            station_page("D22A093", 2015),
            station_page("E14A027", 2015),
        ],
    );
    // The 2016 volume reprints the 2015 page for D22A093
    write_document(
        &dir,
        "dsi_2016.txt",
        &[
            station_page("D22A093", 2015),
            station_page("D22A093", 2016),
        ],
    );

    let config = config(&dir);
    let stats = run_pipeline(&dir, &config);

    assert_eq!(stats.pages_scanned, 5);
    assert_eq!(stats.candidates, 4);
    assert_eq!(stats.finalized, 3);
    assert_eq!(stats.duplicates_skipped, 1);
    assert_eq!(stats.partials, 0);

    let (headers, rows) = read_rows(&config.output_file);
    assert_eq!(rows.len(), 3);

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let keys: Vec<(String, String)> = rows
        .iter()
        .map(|r| {
            (
                r.get(col("station_code")).unwrap().to_string(),
                r.get(col("year")).unwrap().to_string(),
            )
        })
        .collect();
    assert!(keys.contains(&("D22A093".to_string(), "2015".to_string())));
    assert!(keys.contains(&("E14A027".to_string(), "2015".to_string())));
    assert!(keys.contains(&("D22A093".to_string(), "2016".to_string())));

    // Spot-check the normalized values on one row
    let row = &rows[0];
    assert_eq!(row.get(col("catchment_area_km2")).unwrap(), "210");
    assert_eq!(row.get(col("annual_avg_flow_m3s")).unwrap(), "4.711");
    assert_eq!(row.get(col("oct_avg_flow_m3s")).unwrap(), "1.5");
    assert_eq!(row.get(col("sep_avg_flow_m3s")).unwrap(), "12.5");
    assert_eq!(row.get(col("annual_total_m3")).unwrap(), "149.05");
    assert_eq!(row.get(col("mm_total")).unwrap(), "710");
    assert_eq!(row.get(col("avg_specific_discharge")).unwrap(), "22.4");
    assert_eq!(
        row.get(col("observation_period")).unwrap(),
        "06.11.1990 - 30.09.2020"
    );
}

#[test]
fn partial_pages_land_in_the_review_file() {
    let dir = tempfile::tempdir().unwrap();
    // Break the average row: eleven columns instead of twelve
    let mut page = station_page("D22A093", 2015);
    page = page.replace(
        "Ortalama 1,5 2,5 3,5 4,5 5,5 6,5 7,5 8,5 9,5 10,5 11,5 12,5",
        "Ortalama 1,5 2,5 3,5 4,5 5,5 6,5 7,5 8,5 9,5 10,5 11,5",
    );
    write_document(&dir, "dsi_2015.txt", &[page]);

    let config = config(&dir);
    let stats = run_pipeline(&dir, &config);
    assert_eq!(stats.finalized, 0);
    assert_eq!(stats.partials, 1);

    let (_, primary_rows) = read_rows(&config.output_file);
    assert!(primary_rows.is_empty());

    let (headers, review_rows) = read_rows(config.review_file.as_ref().unwrap());
    assert_eq!(review_rows.len(), 1);
    let missing_col = headers.iter().position(|h| h == "missing_fields").unwrap();
    assert!(review_rows[0].get(missing_col).unwrap().contains("average_row"));
}

#[test]
fn resumed_runs_skip_already_written_station_years() {
    let dir = tempfile::tempdir().unwrap();
    write_document(&dir, "dsi_2015.txt", &[station_page("D22A093", 2015)]);

    let first_config = config(&dir);
    let first = run_pipeline(&dir, &first_config);
    assert_eq!(first.finalized, 1);

    // Second run resumes into the same output and adds one new year
    write_document(&dir, "dsi_2016.txt", &[station_page("D22A093", 2016)]);
    let resumed_config = config(&dir).with_resume();
    let second = run_pipeline(&dir, &resumed_config);
    assert_eq!(second.duplicates_skipped, 1);
    assert_eq!(second.finalized, 1);

    let (_, rows) = read_rows(&resumed_config.output_file);
    assert_eq!(rows.len(), 2);
}

#[test]
fn undecodable_pages_do_not_sink_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dsi_2015.txt");
    let mut bytes = station_page("D22A093", 2015).into_bytes();
    bytes.push(0x0C);
    bytes.extend([0xFF, 0xFE]);
    std::fs::write(&path, bytes).unwrap();

    let config = config(&dir);
    let stats = run_pipeline(&dir, &config);
    assert_eq!(stats.page_errors, 1);
    assert_eq!(stats.finalized, 1);
}
