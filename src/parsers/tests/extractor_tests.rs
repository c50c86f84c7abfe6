use crate::config::Markers;
use crate::errors::ReportError;
use crate::parsers::{FieldOutcome, RecordExtractor};
use crate::results::AlertRecord;

fn entry(name: &str, identifier: &str, date: &str) -> String {
    format!(
        r#"<div class="views-row">
  <div class="alertas-invima-list">
    <div class="views-field views-field-title">
      <span class="field-content"><a href="/alerta/1">{}</a></span>
    </div>
    <div class="views-field views-field-field-numero-de-id-d-m">
      <div class="field-content">{}</div>
    </div>
    <div class="views-field views-field-field-a-o">
      <div class="field-content">{}</div>
    </div>
  </div>
</div>"#,
        name, identifier, date
    )
}

fn page(entries: &[String]) -> String {
    format!(
        "<html><head><title>Alertas</title></head><body><div class=\"view-content\">{}</div></body></html>",
        entries.join("\n")
    )
}

#[cfg(test)]
mod extraction_tests {
    use super::*;

    #[test]
    fn test_extracts_entries_in_document_order() {
        let html = page(&[
            entry("Bomba de infusión", "RISARH-001", "2024-03-15"),
            entry("Monitor multiparámetro", "RISARH-002", "2024-03-16"),
            entry("Catéter venoso", "RISARH-003", "2024-03-17"),
        ]);
        let records = RecordExtractor::default().extract(&html);
        assert_eq!(
            records,
            vec![
                AlertRecord::new("Bomba de infusión", "RISARH-001", "2024-03-15"),
                AlertRecord::new("Monitor multiparámetro", "RISARH-002", "2024-03-16"),
                AlertRecord::new("Catéter venoso", "RISARH-003", "2024-03-17"),
            ]
        );
    }

    #[test]
    fn test_no_containers_is_empty_not_error() {
        let extractor = RecordExtractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("<html><body><p>Sin resultados</p></body></html>").is_empty());
        assert!(extractor.extract("not even <markup").is_empty());
    }

    #[test]
    fn test_missing_field_is_empty_and_neighbours_survive() {
        let broken = r#"<div class="alertas-invima-list">
            <div class="views-field-title">Sin identificador</div>
            <div class="views-field-field-a-o">2024-01-02</div>
        </div>"#
            .to_string();
        let html = page(&[
            entry("Primero", "ID-1", "2024-01-01"),
            broken,
            entry("Tercero", "ID-3", "2024-01-03"),
        ]);

        let records = RecordExtractor::default().extract(&html);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], AlertRecord::new("Primero", "ID-1", "2024-01-01"));
        assert_eq!(records[1], AlertRecord::new("Sin identificador", "", "2024-01-02"));
        assert_eq!(records[2], AlertRecord::new("Tercero", "ID-3", "2024-01-03"));
    }

    #[test]
    fn test_container_without_any_field() {
        let html = page(&[r#"<div class="alertas-invima-list"><p>vacío</p></div>"#.to_string()]);
        let records = RecordExtractor::default().extract(&html);
        assert_eq!(records, vec![AlertRecord::default()]);
    }

    #[test]
    fn test_detailed_outcomes_distinguish_blank_from_missing() {
        let html = page(&[r#"<div class="alertas-invima-list">
            <div class="views-field-title">  Nombre  </div>
            <div class="views-field-field-numero-de-id-d-m">   </div>
        </div>"#
            .to_string()]);

        let detailed = RecordExtractor::default().extract_detailed(&html);
        assert_eq!(detailed.len(), 1);
        assert_eq!(detailed[0].name, FieldOutcome::Found("Nombre".to_string()));
        assert_eq!(detailed[0].identifier, FieldOutcome::Blank);
        assert_eq!(detailed[0].date, FieldOutcome::Missing);

        let record = detailed[0].clone().into_record();
        assert_eq!(record.identifier, "");
        assert_eq!(record.date, "");
    }

    #[test]
    fn test_field_text_is_trimmed_not_collapsed() {
        let html = page(&[r#"<div class="alertas-invima-list">
            <div class="views-field-title">  Bomba
   de infusión  </div>
        </div>"#
            .to_string()]);

        let records = RecordExtractor::default().extract(&html);
        assert_eq!(records[0].name, "Bomba\n   de infusión");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let same = entry("Repetida", "ID-9", "2024-05-05");
        let records = RecordExtractor::default().extract(&page(&[same.clone(), same]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }
}

#[cfg(test)]
mod marker_tests {
    use super::*;

    #[test]
    fn test_custom_markers() {
        let markers = Markers {
            container: "li.alert".to_string(),
            name: ".title".to_string(),
            identifier: ".code".to_string(),
            date: "time".to_string(),
        };
        let html = r#"<ul>
            <li class="alert"><span class="title">Guantes</span><span class="code">X-1</span><time>2023</time></li>
        </ul>"#;
        let records = RecordExtractor::new(&markers).unwrap().extract(html);
        assert_eq!(records, vec![AlertRecord::new("Guantes", "X-1", "2023")]);
    }

    #[test]
    fn test_invalid_marker_is_config_error() {
        let markers = Markers {
            container: "div[".to_string(),
            ..Markers::default()
        };
        match RecordExtractor::new(&markers) {
            Err(ReportError::Config { field, .. }) => assert_eq!(field, "markers"),
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }
}
