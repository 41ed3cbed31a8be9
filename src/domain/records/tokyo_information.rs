use crate::domain::documents::LinkDocument;
use crate::domain::record::define_record;

define_record! {
    /// Corporation details published on the Tokyo disclosure site
    pub struct TokyoInformation {
        corporate_number: String => "法人番号",
        approval_date: String => "認証日",
        corporate_name: String => "法人・団体名称",
        corporate_name_kana: String => "法人・団体名称カナ",
        main_office_address: String => "主たる事務所の所在地",
        secondary_office_address: String => "従たる事務所の所在地" [optional],
        representative_name: String => "代表者氏名",
        articles_of_incorporation_purpose: String => "定款に記載された目的",
        activity_fields: String => "活動分野",
        phone_number: String => "電話番号",
        fiscal_year: String => "事業年度",
        approval_status: String => "認定状態",
        approval_date_for_exception: String => "認定（特例認定）日" [optional],
        validity_period: String => "有効期間",
        dissolution_date: String => "解散日" [optional],
        dissolution_reason: String => "解散理由" [optional],
        documents: Vec<LinkDocument> => "閲覧書類",
    }
}
