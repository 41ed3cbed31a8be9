use crate::domain::record::define_record;

/// Header text of the ledger's first column
pub const LEDGER_HEADER_SENTINEL: &str = "所轄庁コード";

define_record! {
    /// One row of the approved NPO ledger (PDF)
    pub struct ApprovedRow {
        control_code: String => "所轄庁コード",
        control_office: String => "所轄庁",
        corporate_number: String => "法人番号",
        approved: String => "認定",
        special_approved: String => "特例認定",
        update_application: String => "更新申請中",
        corporation_name: String => "法人名",
        head_office_address: String => "主たる事務所の所在地",
        representative_name: String => "代表者氏名",
        pst_relative_value: String => "PST基準 相対値",
        pst_absolute_value: String => "PST基準 絶対値",
        pst_specified_by_law: String => "PST基準 条例指定",
        pst_specified_by_law_local_government_name: String => "PST基準 条例指定 自治体名",
        approved_validity_period_from: String => "認定有効期間 自",
        approved_validity_period_to: String => "認定有効期間 至",
        special_approved_validity_period_from: String => "特例認定有効期間 自",
        special_approved_validity_period_to: String => "特例認定有効期間 至",
    }
}
