//! 自動化機器カタログ
//!
//! Step2プロンプトに埋め込む参考価格表と、確定データ編集で使う業種リスト。
//! 価格の単位は万ウォン（レンタルは36ヶ月契約の月額）。

/// 機器定義
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquipmentDef {
    pub category: &'static str,
    pub maker: &'static str,
    pub model: &'static str,
    pub price_one_time: f64,
    pub price_rental: f64,
}

const fn equipment(
    category: &'static str,
    maker: &'static str,
    model: &'static str,
    price_one_time: f64,
    price_rental: f64,
) -> EquipmentDef {
    EquipmentDef {
        category,
        maker,
        model,
        price_one_time,
        price_rental,
    }
}

/// 提案可能な機器（宣言順がそのまま価格表の行順になる）
pub const AVAILABLE_EQUIPMENT: &[EquipmentDef] = &[
    // 서빙로봇
    equipment("서빙로봇", "푸두봇", "푸두봇", 1600.0, 30.0),
    equipment("서빙로봇", "베어로보틱스", "서비(Servi)", 2200.0, 45.0),
    equipment("서빙로봇", "로보와이드", "서브봇 S1", 1300.0, 19.0),
    // 테이블오더
    equipment("테이블오더", "KT", "KT오더", 200.0, 3.0),
    equipment("테이블오더", "페이히어", "페이히어오더", 160.0, 2.0),
    // 키오스크
    equipment("키오스크", "아임유", "KIOSK T-series", 200.0, 2.5),
    equipment("키오스크", "삼성전자", "KM24A 키오스크", 230.0, 2.7),
    // 자동후라이어
    equipment("자동후라이어", "경일주방", "경일 후라이어 - 대형", 16000.0, 399.0),
    equipment("자동후라이어", "경일주방", "경일 후라이어 - 소형", 2000.0, 50.0),
    // 자동볶음기
    equipment("자동볶음기", "경일주방", "경일 자동볶음기 - 소형", 2000.0, 50.0),
    equipment("자동볶음기", "경일주방", "경일 자동볶음기 - 중형", 4000.0, 100.0),
    // 청소로봇
    equipment("청소로봇", "가우시움", "가우시움 (청소봇)", 2000.0, 50.0),
    equipment("청소로봇", "클린테크", "클린테크 (청소봇)", 3000.0, 60.0),
    equipment("청소로봇", "푸두청소봇", "푸두청소봇 (청소봇)", 1500.0, 40.0),
    // 맥주자동디스펜서
    equipment("맥주자동디스펜서", "히오자키", "맥주자동디스펜서 4구", 1400.0, 35.0),
    // 초음파세척기
    equipment("초음파세척기", "경일주방", "초음파세척 모듈형", 1500.0, 38.0),
    equipment("초음파세척기", "경일주방", "초음파세척 중형", 3200.0, 180.0),
    // 커피 자동화로봇
    equipment("커피 자동화로봇", "Teatime", "Teatime-1", 3500.0, 85.0),
];

/// 業種リスト（確定データ編集時の選択肢）
pub const STORE_CATEGORIES: &[&str] = &[
    "맥주집", "BAR", "뷔페", "치킨", "족발", "보쌈", "샐러드", "간식",
    "한식", "분식", "돈까스", "탕요리", "구이", "피자", "중식", "일식",
    "회", "양식", "커피 및 디저트", "아시안", "샌드위치 및 버거", "멕시칸",
    "도시락", "죽", "기타",
];

const PRICE_TABLE_HEADER: &str =
    "| 장비군 | Maker | 모델 | 일시불 가격(만원) | Rental(36개월, 월 만원) |\n|---|---|---|---|---|\n";

/// Markdown形式の価格表を生成
///
/// 数値は `Display` のまま埋め込む（丸め・桁区切りなし）。
pub fn price_table() -> String {
    let mut table = String::from(PRICE_TABLE_HEADER);
    for eq in AVAILABLE_EQUIPMENT {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            eq.category, eq.maker, eq.model, eq.price_one_time, eq.price_rental
        ));
    }
    table
}

/// カテゴリ名から機器を検索（宣言順）
pub fn equipment_in_category(category: &str) -> Vec<&'static EquipmentDef> {
    AVAILABLE_EQUIPMENT
        .iter()
        .filter(|eq| eq.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(AVAILABLE_EQUIPMENT.len(), 18);
    }

    #[test]
    fn test_price_table_rows_in_declaration_order() {
        let table = price_table();
        let rows: Vec<&str> = table.lines().skip(2).collect();

        assert_eq!(rows.len(), AVAILABLE_EQUIPMENT.len());
        assert_eq!(rows[0], "| 서빙로봇 | 푸두봇 | 푸두봇 | 1600 | 30 |");
        assert_eq!(rows[17], "| 커피 자동화로봇 | Teatime | Teatime-1 | 3500 | 85 |");
    }

    #[test]
    fn test_price_table_numbers_verbatim() {
        let table = price_table();
        assert!(table.contains("| 경일 후라이어 - 대형 | 16000 | 399 |"));
        assert!(table.contains("| KIOSK T-series | 200 | 2.5 |"));
        assert!(!table.contains("16,000"));
    }

    #[test]
    fn test_price_table_header() {
        let table = price_table();
        assert!(table.starts_with("| 장비군 | Maker | 모델 |"));
        assert_eq!(table.lines().nth(1), Some("|---|---|---|---|---|"));
    }

    #[test]
    fn test_equipment_in_category() {
        let robots = equipment_in_category("서빙로봇");
        assert_eq!(robots.len(), 3);
        assert_eq!(robots[1].maker, "베어로보틱스");
        assert!(equipment_in_category("없는장비").is_empty());
    }

    #[test]
    fn test_store_categories_contains_other() {
        assert_eq!(STORE_CATEGORIES.last(), Some(&"기타"));
        assert!(STORE_CATEGORIES.contains(&"치킨"));
    }
}
