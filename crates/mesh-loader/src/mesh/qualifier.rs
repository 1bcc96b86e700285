//! MeSH qualifier record parser.

use mesh_types::QualifierRecord;

use super::common::{parse_concept_list, parse_tree_number_list};
use super::MeshRecord;
use crate::element::Element;
use crate::extract::{child_text, date, string_child};

/// Builds a qualifier document from a `<QualifierRecord>` element.
pub fn parse_qualifier_record(element: &Element) -> QualifierRecord {
    QualifierRecord {
        ui: child_text(Some(element), "QualifierUI"),
        name: string_child(element.child("QualifierName")),
        date_created: date(element.child("DateCreated")),
        date_revised: date(element.child("DateRevised")),
        date_established: date(element.child("DateEstablished")),
        annotation: child_text(Some(element), "Annotation"),
        history_note: child_text(Some(element), "HistoryNote"),
        online_note: child_text(Some(element), "OnlineNote"),
        tree_numbers: parse_tree_number_list(element.child("TreeNumberList")),
        concepts: parse_concept_list(element.child("ConceptList")),
    }
}

impl MeshRecord for QualifierRecord {
    const RECORD_TAG: &'static str = "QualifierRecord";

    fn from_element(element: &Element) -> Self {
        parse_qualifier_record(element)
    }

    fn is_empty(&self) -> bool {
        QualifierRecord::is_empty(self)
    }

    fn ui(&self) -> Option<&str> {
        self.ui.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::stream::ElementStream;

    const SAMPLE: &str = include_str!("../../../../testdata/qual_sample.xml");

    #[test]
    fn test_parse_qualifier_record() {
        let element = ElementStream::new(SAMPLE.as_bytes(), "QualifierRecord")
            .next()
            .unwrap()
            .unwrap();
        let record = parse_qualifier_record(&element);

        assert_eq!(record.ui.as_deref(), Some("Q000000981"));
        assert_eq!(record.name.as_deref(), Some("diagnostic imaging"));
        assert_eq!(record.date_created, NaiveDate::from_ymd_opt(2016, 6, 29));
        assert_eq!(record.date_revised, NaiveDate::from_ymd_opt(2016, 6, 8));
        assert_eq!(record.date_established, NaiveDate::from_ymd_opt(2017, 1, 1));
        assert_eq!(record.history_note.as_deref(), Some("2017(1967)"));
        assert_eq!(record.tree_numbers, vec!["Y04.010", "Y04.011"]);

        assert_eq!(record.concepts.len(), 2);
        assert_eq!(record.concepts[0].ui.as_deref(), Some("M000614856"));
        assert_eq!(record.concepts[0].relations.len(), 4);
        assert_eq!(record.concepts[0].terms[0].abbreviation.as_deref(), Some("DG"));
        assert_eq!(record.concepts[1].name.as_deref(), Some("ultrasound"));
    }
}
