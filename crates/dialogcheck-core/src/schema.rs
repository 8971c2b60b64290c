/// Column names shared by the loader, the writers and the tagged-input path.
pub mod columns {
    pub const CONVERSATION_ID: &str = "conversation_id";
    /// Column name used by call-centre exports.
    pub const CONVERSATION_ID_ALIAS: &str = "dlg_id";
    pub const ROLE: &str = "role";
    pub const TEXT: &str = "text";

    pub const GREETING: &str = "greeting";
    pub const MANAGER_NAME: &str = "manager_name";
    pub const SELF_REPRESENTED: &str = "manager_self_represented";
    pub const COMPANY_NAME: &str = "company_name";
    pub const GOODBYE: &str = "goodbye";

    pub const EXTRACTED_MANAGER_NAME: &str = "extracted_manager_name";
    pub const EXTRACTED_COMPANY_NAME: &str = "extracted_company_name";
    pub const CHECK_PASSED: &str = "check_passed";

    /// Tag columns in output order.
    pub const TAGS: &[&str] = &[
        GREETING,
        MANAGER_NAME,
        SELF_REPRESENTED,
        COMPANY_NAME,
        GOODBYE,
    ];
}

/// Arrow schema definitions for transcript, tag and report tables.
pub mod dialog {
    use arrow::datatypes::{DataType, Field, Schema};

    use super::columns;

    /// Schema of the minimal input transcript.
    pub fn transcript_schema() -> Schema {
        Schema::new(vec![
            Field::new(columns::CONVERSATION_ID, DataType::Utf8, false),
            Field::new(columns::ROLE, DataType::Utf8, false),
            Field::new(columns::TEXT, DataType::Utf8, true),
        ])
    }

    /// Line-level tag columns, appended to the input columns on output.
    pub fn tag_fields() -> Vec<Field> {
        vec![
            Field::new(columns::GREETING, DataType::Int32, false),
            Field::new(columns::MANAGER_NAME, DataType::Utf8, true),
            Field::new(columns::SELF_REPRESENTED, DataType::Int32, false),
            Field::new(columns::COMPANY_NAME, DataType::Utf8, true),
            Field::new(columns::GOODBYE, DataType::Int32, false),
        ]
    }

    /// Schema of the per-conversation report.
    pub fn report_schema() -> Schema {
        Schema::new(vec![
            Field::new(columns::CONVERSATION_ID, DataType::Utf8, false),
            Field::new(columns::GREETING, DataType::Int64, false),
            Field::new(columns::MANAGER_NAME, DataType::Int64, false),
            Field::new(columns::SELF_REPRESENTED, DataType::Int64, false),
            Field::new(columns::COMPANY_NAME, DataType::Int64, false),
            Field::new(columns::GOODBYE, DataType::Int64, false),
            Field::new(columns::EXTRACTED_MANAGER_NAME, DataType::Utf8, true),
            Field::new(columns::EXTRACTED_COMPANY_NAME, DataType::Utf8, true),
            Field::new(columns::CHECK_PASSED, DataType::Int32, false),
        ])
    }
}
