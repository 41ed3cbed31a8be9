use crate::domain::record::define_record;

define_record! {
    /// One row of the bulk export covering every registered NPO
    pub struct AllOrgRow {
        /// First column; join key when the corporate number is unusable
        corporation_name: String => "法人名称",
        corporation_name_kana: String => "法人名称カナ",
        control_office: String => "所轄庁",
        delegated_municipality: String => "権限移譲先市町村",
        head_office_address: String => "主たる事務所の所在地",
        head_office_postal_code: String => "主たる事業所の郵便番号",
        branch_office_address: String => "従たる事務所の所在地",
        representative_name: String => "代表者氏名",
        representative_name_kana: String => "団体代表者名（フリガナ）",
        corporate_establishment_certification_date: String => "法人設立認証年月日",
        establishment_date: String => "設立年月日",
        purpose_described_in_the_articles: String => "定款に記載された目的",
        activity_area_1: String => "活動分野１",
        activity_area_2: String => "活動分野２",
        activity_area_3: String => "活動分野３",
        activity_area_4: String => "活動分野４",
        activity_area_5: String => "活動分野５",
        activity_area_6: String => "活動分野６",
        activity_area_7: String => "活動分野７",
        activity_area_8: String => "活動分野８",
        activity_area_9: String => "活動分野９",
        activity_area_10: String => "活動分野１０",
        activity_area_11: String => "活動分野１１",
        activity_area_12: String => "活動分野１２",
        activity_area_13: String => "活動分野１３",
        activity_area_14: String => "活動分野１４",
        activity_area_15: String => "活動分野１５",
        activity_area_16: String => "活動分野１６",
        activity_area_17: String => "活動分野１７",
        activity_area_18: String => "活動分野１８",
        activity_area_19: String => "活動分野１９",
        activity_area_20: String => "活動分野２０",
        approved_1: String => "認定（認定・特例認定１）",
        approved_2: String => "認定（認定・特例認定２）",
        approved_3: String => "認定（認定・特例認定３）",
        approved_4: String => "認定（認定・特例認定４）",
        pst_standard_1: String => "認定（PST基準１）",
        pst_standard_2: String => "認定（PST基準２）",
        pst_standard_3: String => "認定（PST基準３）",
        pst_standard_specified_by_law: String => "認定（PST基準 条例指定（都道府県及び市区町村名））",
        approved_start_date: String => "認定（認定開始日）",
        approved_expiration_date: String => "認定（認定満了日）",
        approved_cancellation_date: String => "認定（認定取消日）",
        special_approved_date: String => "認定（特例認定年月日）",
        special_approved_expiration_date: String => "認定（特例認定満了日）",
        special_approved_cancellation_date: String => "認定（特例認定取消日）",
        supervision_information: String => "監督情報",
        dissolution_information: String => "解散情報",
        /// Link to the portal detail page
        corporate_information_url: String => "法人情報URL",
        corporate_number: String => "法人番号",
        individual_specified_by_law_flag: String => "条例個別指定フラグ",
        specific_non_profit_activities: String => "特定非営利活動に係る事業",
        other_business: String => "その他の事業",
        business_year_start_date: String => "事業年度開始日",
        business_year_end_date: String => "事業年度終了日",
        individual_specified_by_law_validity_start_date: String => "条例個別指定：有効期間(開始日)",
        individual_specified_by_law_validity_expiration_date: String => "条例個別指定：有効期間(満了日)",
        individual_specified_by_law_validity_update_application_date: String => "条例個別指定：有効期限（更新申請日)",
        individual_specified_by_law_validity_update_date: String => "条例個別指定：有効期限（更新日)",
        individual_specified_by_law_validity_cancellation_date: String => "条例個別指定：有効期限（条例個別指定：取消日)",
    }
}
