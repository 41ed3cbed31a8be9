use crate::domain::record::define_record;

define_record! {
    /// "Basic information" table of a portal detail page
    pub struct DetailInformation {
        jurisdiction: String => "所轄庁",
        delegated_municipality: String => "権限移譲先市町村",
        corporate_name: String => "法人名称",
        corporate_name_kana: String => "法人名称（フリガナ）",
        main_office_postal_code: String => "主たる事業所の郵便番号",
        main_office_address: String => "主たる事務所の所在地",
        secondary_office_address: String => "従たる事務所の所在地",
        representative_name: String => "代表者氏名",
        representative_name_kana: String => "代表者氏名（フリガナ）",
        establishment_approval_date: String => "設立認証年月日",
        establishment_date: String => "設立年月日",
        articles_of_incorporation_purpose: String => "定款に記載された目的",
        activity_fields: String => "活動分野",
        specified_nonprofit_activities: String => "特定非営利活動に係る事業",
        other_business: String => "その他の事業",
        fiscal_year_start: String => "事業年度開始日",
        fiscal_year_end: String => "事業年度終了日",
        corporate_number: String => "法人番号",
        approval_status: String => "認定" [optional],
        /// Only some jurisdictions publish a disclosure site
        jurisdiction_public_site: String => "所轄庁の情報公開サイト" [optional],
        dissolution_date: String => "解散日" [optional],
        dissolution_reason: String => "解散理由" [optional],
        individual_approval_by_ordinance: String => "条例による個別認定" [optional],
    }
}
