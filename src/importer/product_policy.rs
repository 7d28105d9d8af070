// ==========================================
// Bling 批量导入网关 - 产品导入策略
// ==========================================
// 工作表: 第一个
// 列: A 名称* | B 编码* | C 价格* | D 描述 | E 单位（默认 UN）
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{EntityKind, ProductPayload};
use crate::importer::entity_policy::{EntityPolicy, PolicyTiming, RequiredField};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::DecodedRow;

const COL_NAME: usize = 0;
const COL_CODE: usize = 1;
const COL_PRICE: usize = 2;
const COL_DESCRIPTION: usize = 3;
const COL_UNIT: usize = 4;

const TRACKED: [usize; 3] = [COL_NAME, COL_CODE, COL_PRICE];

#[derive(Debug, Clone)]
pub struct ProductPolicy {
    timing: PolicyTiming,
}

impl ProductPolicy {
    pub fn new(timing: PolicyTiming) -> Self {
        Self { timing }
    }

    pub fn from_config<C: ImportConfigReader + ?Sized>(config: &C) -> Self {
        Self::new(PolicyTiming::from_config(config, EntityKind::Product))
    }
}

impl Default for ProductPolicy {
    fn default() -> Self {
        Self::from_config(&crate::config::ImportConfig::default())
    }
}

impl EntityPolicy for ProductPolicy {
    type Payload = ProductPayload;

    fn kind(&self) -> EntityKind {
        EntityKind::Product
    }

    fn tracked_columns(&self) -> &'static [usize] {
        &TRACKED
    }

    fn timing(&self) -> PolicyTiming {
        self.timing
    }

    fn map_row(&self, row: &DecodedRow) -> ProductPayload {
        let mapper = FieldMapper;
        ProductPayload {
            nome: mapper.get_string(row, COL_NAME),
            codigo: mapper.get_string(row, COL_CODE),
            preco: mapper.parse_number(row, COL_PRICE),
            tipo: "P".to_string(),
            situacao: "A".to_string(),
            formato: "S".to_string(),
            descricao: mapper.get_string(row, COL_DESCRIPTION),
            unidade: mapper
                .get_string(row, COL_UNIT)
                .unwrap_or_else(|| "UN".to_string()),
        }
    }

    fn required_fields(&self, payload: &ProductPayload) -> Vec<RequiredField> {
        vec![
            RequiredField::text("Nome", payload.nome.as_deref()),
            RequiredField::text("Código", payload.codigo.as_deref()),
            RequiredField::number("Preço", payload.preco),
        ]
    }
}
