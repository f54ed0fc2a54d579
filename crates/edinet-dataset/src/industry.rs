//! Industry-classification records.
//!
//! The EDINET code list assigns each filer one of the 33 Tokyo Stock Exchange
//! industries. Records carry the coarser 16-group label.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use edinet_core::{EncodedSections, FinancialStatementDocument, Result};
use edinet_parser::{FilingParser, ParseOutcome};

use crate::record::{DatasetRecord, doc_id_from_path};

/// Label of industries outside the 33-industry classification.
pub const INVALID_INDUSTRY: &str = "invalid";

/// Maps a 33-industry name onto its 16-group label.
#[must_use]
pub fn industry_group(industry: &str) -> &'static str {
    match industry {
        "水産・農林業" | "食料品" => "食品",
        "鉱業" | "石油・石炭製品" | "電気・ガス業" => "電気・ガス・エネルギー資源",
        "建設業" | "金属製品" | "ガラス・土石製品" => "建設・資材",
        "繊維製品" | "パルプ・紙" | "化学" => "素材・化学",
        "医薬品" => "医薬品",
        "ゴム製品" | "輸送用機器" => "自動車・輸送機",
        "鉄鋼" | "非鉄金属" => "鉄鋼・非鉄",
        "機械" => "機械",
        "電気機器" | "精密機器" => "電機・精密",
        "その他製品" | "情報・通信業" | "サービス業" => "情報通信・サービスその他",
        "陸運業" | "海運業" | "空運業" | "倉庫・運輸関連" => "運輸・物流",
        "卸売業" => "商社・卸売",
        "小売業" => "小売",
        "銀行業" => "銀行",
        "証券、商品先物取引業" | "保険業" | "その他金融業" => "金融(除く銀行)",
        "不動産業" => "不動産",
        _ => INVALID_INDUSTRY,
    }
}

/// The 16 group labels, in display order.
pub const INDUSTRY_GROUPS: [&str; 16] = [
    "食品",
    "電気・ガス・エネルギー資源",
    "建設・資材",
    "素材・化学",
    "医薬品",
    "自動車・輸送機",
    "鉄鋼・非鉄",
    "機械",
    "電機・精密",
    "情報通信・サービスその他",
    "運輸・物流",
    "商社・卸売",
    "小売",
    "銀行",
    "金融(除く銀行)",
    "不動産",
];

/// One industry-classification example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryRecord {
    /// Sections of the filing.
    #[serde(flatten)]
    pub sections: EncodedSections,
    /// 16-group industry label.
    pub industry: String,
    /// EDINET code of the filer.
    pub edinet_code: String,
    /// Identifier of the filing.
    pub doc_id: String,
    /// Path of the filing's export.
    pub file_path: String,
}

impl IndustryRecord {
    /// Builds a record from a parsed filing and its industry group. Returns
    /// `None` when the document has no EDINET code.
    pub fn new(document: &FinancialStatementDocument, industry: &str, path: &Path) -> Result<Option<Self>> {
        let Some(edinet_code) = document.edinet_code() else {
            return Ok(None);
        };
        Ok(Some(Self {
            sections: document.encode_sections()?,
            industry: industry.to_string(),
            edinet_code: edinet_code.to_string(),
            doc_id: doc_id_from_path(path),
            file_path: path.display().to_string(),
        }))
    }
}

impl DatasetRecord for IndustryRecord {
    fn sections(&self) -> &EncodedSections {
        &self.sections
    }

    fn edinet_code(&self) -> &str {
        &self.edinet_code
    }

    fn doc_id(&self) -> &str {
        &self.doc_id
    }
}

/// Parses one export and builds an industry record.
pub fn build_industry_record(
    path: &Path,
    industry: &str,
    parser: &FilingParser,
) -> Result<Option<IndustryRecord>> {
    match parser.parse(path)?.outcome {
        ParseOutcome::Document(document) => IndustryRecord::new(&document, industry, path),
        ParseOutcome::NotApplicable(reason) => {
            debug!(path = %path.display(), ?reason, "Filing not applicable");
            Ok(None)
        }
    }
}
