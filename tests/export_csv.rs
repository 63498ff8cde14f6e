mod common;

use std::fs;

use common::{sample_session, temp_base_dir};
use shift_core::export::{build_sections, export_csv, render_csv, DEFAULT_FILE_NAME};

#[test]
fn sections_come_out_in_fixed_order() {
    let titles: Vec<&str> = build_sections(&sample_session())
        .iter()
        .map(|section| section.title)
        .collect();
    assert_eq!(
        titles,
        vec![
            "Lottery Management Data",
            "Gas and Diesel Data",
            "Sales Management Data",
            "Sales Totals Data",
            "Money Management Data",
            "In Hand Calculations Data",
        ]
    );
}

#[test]
fn unsubmitted_forms_export_headers_only() {
    let csv = render_csv(&sample_session()).unwrap();
    assert!(csv.contains("$5,1514,10,40,30,150\n$20,1543,5,2,27,540\n\n"));
    assert!(csv.contains("gas,2,29,,1000,250,50,\n\n"));
    assert!(csv.contains("Sales Management Data\nField,Value\n\n"));
    assert!(csv.contains("In Hand Calculations Data\nType,Field,Value\n\n"));
}

#[test]
fn submitted_sections_are_exported_from_the_snapshot() {
    let mut session = sample_session();
    session.submit_sales_management();
    session.submit_sales_totals();
    session.submit_in_hand();
    // Edits after submission stay out of the export.
    session.update_sales_management_field("gasSales", "1");

    let csv = render_csv(&session).unwrap();
    assert!(csv.contains("\ngas Sales,300\n"));
    assert!(csv.contains("\nnon Tax Grocery Sales,\n"));
    assert!(csv.contains("\nTotal lotto Total,695\n"));
    assert!(csv.contains("\nTotal gas Total,320\n"));
    assert!(csv.contains("\nCash,cash Balance,100.00\n"));
    assert!(csv.contains("\nCheck,check Balance,80.00\n"));
    assert!(csv.contains("Money Management Data\nField,Value\n\n"));
    assert!(csv.ends_with("\n\n"));
}

#[test]
fn export_writes_default_file_into_a_directory() {
    let base = temp_base_dir();
    let written = export_csv(&sample_session(), &base).unwrap();
    assert_eq!(written, base.join(DEFAULT_FILE_NAME));
    let content = fs::read_to_string(&written).unwrap();
    assert!(content.starts_with("Lottery Management Data\n"));

    let named = export_csv(&sample_session(), &base.join("nested/shift.csv")).unwrap();
    assert!(named.ends_with("nested/shift.csv"));
    assert!(named.exists());
}
