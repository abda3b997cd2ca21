//! Tests for the extraction pipeline
//!
//! Shared fixtures build synthetic yearbook pages line by line so each test
//! controls exactly which anchors, rows, and footer lines are present.


use crate::app::adapters::filesystem::Page;
use crate::config::Config;
use tempfile::TempDir;

/// A synthetic target-station page with a full header, six complete table
/// rows, and a labeled footer
pub fn complete_station_page(code: &str, year: u16) -> Page {
    let mut lines = vec![
        "22. Doğu Karadeniz Havzası".to_string(),
        format!("{code} TURNASUYU DERESİ - ÇAMLI KÖPRÜ"),
        "GÖZLEM SÜRESİ : 06.11.1990 - 30.09.2020".to_string(),
        "YAĞIŞ ALANI : 210,00 km2   YAKLAŞIK KOT : 404 m".to_string(),
        "41°15'30\" Doğu - 41°13'51\" Kuzey".to_string(),
        format!("{year} Su yılında 4,711 m3/sn"),
    ];
    lines.push(table_row("Maks."));
    lines.push(table_row("Min."));
    lines.push(table_row("Ortalama"));
    lines.push(table_row("LT/SN/Km2"));
    lines.push(table_row("AKIM mm."));
    lines.push(table_row("MİL. M3"));
    lines.push("================================".to_string());
    lines.push(format!(
        "SU YILI ({year}) YILLIK TOPLAM AKIM 149,05 MİLYON M3 710 MM. 22,4 LT/SN/Km2"
    ));

    Page { number: 1, lines }
}

/// A target-station page whose average row is short one column, which
/// nulls the averages and makes the record partial
pub fn partial_station_page(code: &str, year: u16) -> Page {
    let mut page = complete_station_page(code, year);
    let average = page
        .lines
        .iter()
        .position(|l| l.starts_with("Ortalama"))
        .unwrap();
    page.lines[average] = "Ortalama 1,0 2,0 3,0 4,0 5,0 6,0 7,0 8,0 9,0 10,0 11,0".to_string();
    page
}

/// A page with a station code outside the target set
pub fn foreign_station_page() -> Page {
    Page {
        number: 1,
        lines: vec![
            "22. Doğu Karadeniz Havzası".to_string(),
            "D22A999 SOME OTHER STREAM".to_string(),
        ],
    }
}

/// A prose page with no station code at all
pub fn index_page() -> Page {
    Page {
        number: 1,
        lines: vec![
            "İÇİNDEKİLER".to_string(),
            "Bölüm 1 ............ 5".to_string(),
        ],
    }
}

fn table_row(label: &str) -> String {
    let values: Vec<String> = (1..=12).map(|i| format!("{i},0")).collect();
    format!("{label} {}", values.join(" "))
}

/// A config pointing all inputs and outputs into a temp dir
pub fn test_config(dir: &TempDir, targets: &[&str]) -> Config {
    Config::default()
        .with_target_stations(targets.iter().copied())
        .with_input_dir(dir.path())
        .with_output_file(dir.path().join("out.csv"))
        .with_review_file(dir.path().join("review.csv"))
        .without_progress()
}
