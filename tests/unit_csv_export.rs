use formation::utils::csv_export::{StudentCsvRow, write_csv};

fn row(last_name: &str, first_name: &str, status: &str) -> StudentCsvRow {
    StudentCsvRow {
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        email: format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        phone: "+33612345678".to_string(),
        status: status.to_string(),
        created_at: "2026-01-15T09:00:00+00:00".to_string(),
    }
}

#[test]
fn test_header_row_column_order() {
    let csv = write_csv(&[row("Durand", "Camille", "enrolled")]).unwrap();

    assert_eq!(
        csv.lines().next().unwrap(),
        "last_name;first_name;email;phone;status;created_at"
    );
}

#[test]
fn test_one_line_per_row() {
    let rows = vec![
        row("Durand", "Camille", "enrolled"),
        row("Martin", "Paul", "completed"),
        row("Bernard", "Lea", "none"),
    ];
    let csv = write_csv(&rows).unwrap();

    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("Martin;Paul;paul.martin@example.com"));
}

#[test]
fn test_semicolon_inside_field_is_quoted() {
    let mut quoted = row("De;La Tour", "Anne", "none");
    quoted.phone = String::new();
    let csv = write_csv(&[quoted]).unwrap();

    assert!(csv.contains("\"De;La Tour\""));
}

#[test]
fn test_accented_names_survive() {
    let csv = write_csv(&[row("Lefèvre", "Héloïse", "enrolled")]).unwrap();

    assert!(csv.contains("Lefèvre;Héloïse"));
}
