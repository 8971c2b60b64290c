//! Conversion between Arrow tables and transcript / tag / report rows.
//!
//! Input tables must carry a conversation id (`conversation_id` or `dlg_id`),
//! `role` and `text`. A row with a missing id or an unknown role fails the
//! whole load with a [`StoreError::ContractViolation`] naming the conversation
//! and the column.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Int32Array, Int64Array, LargeStringArray, StringArray};
use arrow::compute::concat_batches;
use arrow::datatypes::{FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use dialogcheck_core::{
    ConversationReport, Role, TagVector, TaggedLine, TranscriptLine, columns, dialog,
};

use crate::StoreError;

/// Concatenate batches into one, preserving row order.
///
/// An empty input yields an empty batch with the transcript schema.
pub fn combine(batches: &[RecordBatch]) -> Result<RecordBatch, StoreError> {
    match batches.first() {
        None => Ok(RecordBatch::new_empty(Arc::new(dialog::transcript_schema()))),
        Some(first) => Ok(concat_batches(&first.schema(), batches)?),
    }
}

/// Decode transcript rows. `position` is the row index across all batches.
pub fn transcript_lines(batches: &[RecordBatch]) -> Result<Vec<TranscriptLine>, StoreError> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for batch in batches {
        let (id_name, id_col) = conversation_column(batch)?;
        let role_col = required_column(batch, columns::ROLE)?;
        let text_col = required_column(batch, columns::TEXT)?;

        for row in 0..batch.num_rows() {
            let position = offset + row;
            let conversation_id = read_conversation_id(id_col, id_name, row, position)?;

            let role = match get_string(role_col, row) {
                Some(raw) => raw.parse::<Role>().map_err(|e| StoreError::ContractViolation {
                    conversation_id: conversation_id.clone(),
                    column: columns::ROLE.to_string(),
                    row: position,
                    detail: e.to_string(),
                })?,
                None => {
                    return Err(StoreError::ContractViolation {
                        conversation_id,
                        column: columns::ROLE.to_string(),
                        row: position,
                        detail: "missing role".to_string(),
                    });
                }
            };

            lines.push(TranscriptLine {
                conversation_id,
                role,
                text: get_string(text_col, row).unwrap_or_default(),
                position,
            });
        }
        offset += batch.num_rows();
    }

    Ok(lines)
}

/// Decode rows of an already-tagged table (the output of [`with_tags`]).
///
/// Flags accept `0`/`1` and `true`/`false`; names and companies treat null,
/// empty and `0` as absent.
pub fn tagged_lines(batches: &[RecordBatch]) -> Result<Vec<TaggedLine>, StoreError> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for batch in batches {
        let (id_name, id_col) = conversation_column(batch)?;
        let greeting_col = required_column(batch, columns::GREETING)?;
        let name_col = required_column(batch, columns::MANAGER_NAME)?;
        let company_col = required_column(batch, columns::COMPANY_NAME)?;
        let goodbye_col = required_column(batch, columns::GOODBYE)?;

        for row in 0..batch.num_rows() {
            let position = offset + row;
            let conversation_id = read_conversation_id(id_col, id_name, row, position)?;
            let flag = |col: &ArrayRef, column: &str| {
                parse_flag(get_string(col, row).as_deref()).ok_or_else(|| {
                    StoreError::ContractViolation {
                        conversation_id: conversation_id.clone(),
                        column: column.to_string(),
                        row: position,
                        detail: "expected 0 or 1".to_string(),
                    }
                })
            };

            let tags = TagVector {
                greeting: flag(greeting_col, columns::GREETING)?,
                name: extracted_value(get_string(name_col, row)),
                company: extracted_value(get_string(company_col, row)),
                farewell: flag(goodbye_col, columns::GOODBYE)?,
            };
            lines.push(TaggedLine {
                conversation_id,
                tags,
            });
        }
        offset += batch.num_rows();
    }

    Ok(lines)
}

/// Append the tag columns to `input`, replacing any tag columns it already has.
pub fn with_tags(input: &RecordBatch, tags: &[TagVector]) -> Result<RecordBatch, StoreError> {
    if tags.len() != input.num_rows() {
        return Err(StoreError::RowCountMismatch {
            expected: input.num_rows(),
            actual: tags.len(),
        });
    }

    let schema = input.schema();
    let mut fields: Vec<FieldRef> = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for (field, array) in schema.fields().iter().zip(input.columns()) {
        if !columns::TAGS.contains(&field.name().as_str()) {
            fields.push(Arc::clone(field));
            arrays.push(Arc::clone(array));
        }
    }

    fields.extend(dialog::tag_fields().into_iter().map(Arc::new));
    arrays.push(Arc::new(Int32Array::from_iter_values(
        tags.iter().map(|t| i32::from(t.greeting)),
    )));
    arrays.push(Arc::new(StringArray::from(
        tags.iter().map(|t| t.name.as_deref()).collect::<Vec<_>>(),
    )));
    arrays.push(Arc::new(Int32Array::from_iter_values(
        tags.iter().map(|t| i32::from(t.self_represented())),
    )));
    arrays.push(Arc::new(StringArray::from(
        tags.iter().map(|t| t.company.as_deref()).collect::<Vec<_>>(),
    )));
    arrays.push(Arc::new(Int32Array::from_iter_values(
        tags.iter().map(|t| i32::from(t.farewell)),
    )));

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Build the per-conversation report table.
pub fn report_batch(reports: &[ConversationReport]) -> Result<RecordBatch, StoreError> {
    let count = |f: fn(&ConversationReport) -> u64| -> ArrayRef {
        Arc::new(Int64Array::from_iter_values(
            reports.iter().map(|r| f(r) as i64),
        ))
    };

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            reports.iter().map(|r| r.conversation_id.as_str()),
        )),
        count(|r| r.greeting_count),
        count(|r| r.name_count),
        count(|r| r.self_represented_count),
        count(|r| r.company_count),
        count(|r| r.farewell_count),
        Arc::new(StringArray::from(
            reports
                .iter()
                .map(|r| r.extracted_manager_name.as_deref())
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            reports
                .iter()
                .map(|r| r.extracted_company_name.as_deref())
                .collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from_iter_values(
            reports.iter().map(|r| i32::from(r.compliance_passed)),
        )),
    ];

    Ok(RecordBatch::try_new(
        Arc::new(dialog::report_schema()),
        columns,
    )?)
}

// ── Column helpers ──

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, StoreError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
}

/// The conversation id column, under either accepted name.
fn conversation_column(batch: &RecordBatch) -> Result<(&'static str, &ArrayRef), StoreError> {
    [columns::CONVERSATION_ID, columns::CONVERSATION_ID_ALIAS]
        .into_iter()
        .find_map(|name| batch.column_by_name(name).map(|col| (name, col)))
        .ok_or_else(|| StoreError::MissingColumn(columns::CONVERSATION_ID.to_string()))
}

fn read_conversation_id(
    col: &ArrayRef,
    column: &str,
    row: usize,
    position: usize,
) -> Result<String, StoreError> {
    match get_string(col, row) {
        Some(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        _ => Err(StoreError::ContractViolation {
            conversation_id: String::new(),
            column: column.to_string(),
            row: position,
            detail: "missing conversation id".to_string(),
        }),
    }
}

/// Extract a cell as a string: Utf8 and LargeUtf8 directly, other types via
/// Arrow's display formatting (e.g. integer ids from Parquet).
fn get_string(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Some(arr.value(row).to_string());
    }
    if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Some(arr.value(row).to_string());
    }
    arrow::util::display::array_value_to_string(col.as_ref(), row).ok()
}

fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::trim) {
        None | Some("") | Some("0") | Some("false") => Some(false),
        Some("1") | Some("true") => Some(true),
        Some(_) => None,
    }
}

fn extracted_value(raw: Option<String>) -> Option<String> {
    raw.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != "0"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field};

    fn transcript_batch(id_column: &str, rows: &[(Option<&str>, Option<&str>, &str)]) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new(id_column, DataType::Utf8, true),
            Field::new("role", DataType::Utf8, true),
            Field::new("text", DataType::Utf8, true),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(rows.iter().map(|r| r.0).collect::<Vec<_>>())),
                Arc::new(StringArray::from(rows.iter().map(|r| r.1).collect::<Vec<_>>())),
                Arc::new(StringArray::from(rows.iter().map(|r| Some(r.2)).collect::<Vec<_>>())),
            ],
        )
        .unwrap()
    }

    #[test]
    fn decodes_transcript_rows_across_batches() {
        let a = transcript_batch("dlg_id", &[(Some("1"), Some("manager"), "Привет")]);
        let b = transcript_batch("dlg_id", &[(Some("1"), Some("client"), "Алло")]);
        let lines = transcript_lines(&[a, b]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].role, Role::Agent);
        assert_eq!(lines[1].role, Role::Customer);
        assert_eq!(lines[1].position, 1);
        assert_eq!(lines[0].text, "Привет");
    }

    #[test]
    fn accepts_conversation_id_column_name() {
        let batch = transcript_batch("conversation_id", &[(Some("c1"), Some("agent"), "x")]);
        let lines = transcript_lines(&[batch]).unwrap();
        assert_eq!(lines[0].conversation_id, "c1");
    }

    #[test]
    fn missing_role_column_is_reported() {
        let schema = Schema::new(vec![
            Field::new("dlg_id", DataType::Utf8, true),
            Field::new("text", DataType::Utf8, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec!["1"])),
                Arc::new(StringArray::from(vec!["привет"])),
            ],
        )
        .unwrap();
        let err = transcript_lines(&[batch]).unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn(ref c) if c == "role"));
    }

    #[test]
    fn unknown_role_names_conversation_and_column() {
        let batch = transcript_batch(
            "dlg_id",
            &[
                (Some("5"), Some("manager"), "привет"),
                (Some("5"), Some("operator"), "привет"),
            ],
        );
        let err = transcript_lines(&[batch]).unwrap_err();
        match err {
            StoreError::ContractViolation {
                conversation_id,
                column,
                row,
                ..
            } => {
                assert_eq!(conversation_id, "5");
                assert_eq!(column, "role");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_conversation_id_is_a_violation() {
        let batch = transcript_batch("dlg_id", &[(None, Some("manager"), "привет")]);
        let err = transcript_lines(&[batch]).unwrap_err();
        assert!(err.to_string().contains("missing conversation id"));
    }

    #[test]
    fn integer_ids_are_formatted() {
        let schema = Schema::new(vec![
            Field::new("dlg_id", DataType::Int64, false),
            Field::new("role", DataType::Utf8, false),
            Field::new("text", DataType::Utf8, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int64Array::from(vec![42])),
                Arc::new(StringArray::from(vec!["manager"])),
                Arc::new(StringArray::from(vec!["привет"])),
            ],
        )
        .unwrap();
        let lines = transcript_lines(&[batch]).unwrap();
        assert_eq!(lines[0].conversation_id, "42");
    }

    #[test]
    fn with_tags_appends_and_replaces_tag_columns() {
        let input = transcript_batch(
            "dlg_id",
            &[
                (Some("1"), Some("manager"), "привет, это иван"),
                (Some("1"), Some("client"), "здравствуйте"),
            ],
        );
        let tags = vec![
            TagVector {
                greeting: true,
                name: Some("иван".into()),
                ..TagVector::default()
            },
            TagVector::default(),
        ];

        let tagged = with_tags(&input, &tags).unwrap();
        assert_eq!(tagged.num_columns(), 3 + columns::TAGS.len());
        let names = tagged
            .column_by_name(columns::MANAGER_NAME)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(names.value(0), "иван");
        assert!(names.is_null(1));

        // tagging an already tagged table does not duplicate columns
        let again = with_tags(&tagged, &tags).unwrap();
        assert_eq!(again.num_columns(), tagged.num_columns());
    }

    #[test]
    fn with_tags_checks_row_count() {
        let input = transcript_batch("dlg_id", &[(Some("1"), Some("manager"), "привет")]);
        let err = with_tags(&input, &[]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::RowCountMismatch {
                expected: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn tagged_lines_read_back_what_with_tags_wrote() {
        let input = transcript_batch(
            "dlg_id",
            &[
                (Some("1"), Some("manager"), "a"),
                (Some("1"), Some("manager"), "b"),
            ],
        );
        let tags = vec![
            TagVector {
                greeting: true,
                company: Some("ромашка".into()),
                ..TagVector::default()
            },
            TagVector {
                farewell: true,
                ..TagVector::default()
            },
        ];
        let tagged = with_tags(&input, &tags).unwrap();
        let lines = tagged_lines(&[tagged]).unwrap();
        assert_eq!(lines[0].tags, tags[0]);
        assert_eq!(lines[1].tags, tags[1]);
        assert_eq!(lines[1].conversation_id, "1");
    }

    #[test]
    fn tagged_lines_treat_zero_as_absent() {
        let schema = Schema::new(vec![
            Field::new("dlg_id", DataType::Utf8, false),
            Field::new("greeting", DataType::Utf8, true),
            Field::new("manager_name", DataType::Utf8, true),
            Field::new("company_name", DataType::Utf8, true),
            Field::new("goodbye", DataType::Utf8, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec!["1"])),
                Arc::new(StringArray::from(vec!["1"])),
                Arc::new(StringArray::from(vec!["0"])),
                Arc::new(StringArray::from(vec![None::<&str>])),
                Arc::new(StringArray::from(vec!["true"])),
            ],
        )
        .unwrap();
        let lines = tagged_lines(&[batch]).unwrap();
        assert!(lines[0].tags.greeting);
        assert!(lines[0].tags.farewell);
        assert_eq!(lines[0].tags.name, None);
        assert_eq!(lines[0].tags.company, None);
    }

    #[test]
    fn tagged_lines_reject_bad_flag() {
        let schema = Schema::new(vec![
            Field::new("dlg_id", DataType::Utf8, false),
            Field::new("greeting", DataType::Utf8, true),
            Field::new("manager_name", DataType::Utf8, true),
            Field::new("company_name", DataType::Utf8, true),
            Field::new("goodbye", DataType::Utf8, true),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec!["9"])),
                Arc::new(StringArray::from(vec!["yes"])),
                Arc::new(StringArray::from(vec![None::<&str>])),
                Arc::new(StringArray::from(vec![None::<&str>])),
                Arc::new(StringArray::from(vec!["0"])),
            ],
        )
        .unwrap();
        let err = tagged_lines(&[batch]).unwrap_err();
        assert!(err.to_string().contains("\"greeting\""));
        assert!(err.to_string().contains("\"9\""));
    }

    #[test]
    fn report_batch_has_report_schema() {
        let mut passed = ConversationReport::empty("c1");
        passed.greeting_count = 1;
        passed.farewell_count = 1;
        passed.extracted_manager_name = Some("иван".into());
        passed.compliance_passed = true;

        let batch = report_batch(&[passed, ConversationReport::empty("c2")]).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().as_ref(), &dialog::report_schema());

        let check = batch
            .column_by_name(columns::CHECK_PASSED)
            .unwrap()
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap();
        assert_eq!(check.value(0), 1);
        assert_eq!(check.value(1), 0);
    }

    #[test]
    fn combine_empty_gives_transcript_schema() {
        let batch = combine(&[]).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert!(batch.schema().field_with_name("role").is_ok());
    }
}
