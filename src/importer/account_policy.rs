// ==========================================
// Bling 批量导入网关 - 应付/应收账款导入策略
// ==========================================
// 工作表: 第一个
// 列: A 到期日* | B 会计期间* | C 开票日* | D 金额* | E 联系人 ID*
//     F 单据号 | G 摘要 | H 付款方式 ID | I 持有人 ID | J 分类 ID
// 应付 → contas/pagar；应收 → contas/receber
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{AccountPayload, ContactRef, EntityKind, IdRef, Occurrence};
use crate::importer::entity_policy::{EntityPolicy, PolicyTiming, RequiredField};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::DecodedRow;

const COL_DUE_DATE: usize = 0;
const COL_PERIOD: usize = 1;
const COL_ISSUE_DATE: usize = 2;
const COL_AMOUNT: usize = 3;
const COL_CONTACT: usize = 4;
const COL_DOCUMENT: usize = 5;
const COL_HISTORY: usize = 6;
const COL_PAYMENT_METHOD: usize = 7;
const COL_HOLDER: usize = 8;
const COL_CATEGORY: usize = 9;

const TRACKED: [usize; 5] = [
    COL_DUE_DATE,
    COL_PERIOD,
    COL_ISSUE_DATE,
    COL_AMOUNT,
    COL_CONTACT,
];

#[derive(Debug, Clone)]
pub struct AccountPolicy {
    kind: EntityKind,
    timing: PolicyTiming,
}

impl AccountPolicy {
    /// 应付账款
    pub fn payable(timing: PolicyTiming) -> Self {
        Self {
            kind: EntityKind::PayableAccount,
            timing,
        }
    }

    /// 应收账款
    pub fn receivable(timing: PolicyTiming) -> Self {
        Self {
            kind: EntityKind::ReceivableAccount,
            timing,
        }
    }

    pub fn payable_from_config<C: ImportConfigReader + ?Sized>(config: &C) -> Self {
        Self::payable(PolicyTiming::from_config(config, EntityKind::PayableAccount))
    }

    pub fn receivable_from_config<C: ImportConfigReader + ?Sized>(config: &C) -> Self {
        Self::receivable(PolicyTiming::from_config(
            config,
            EntityKind::ReceivableAccount,
        ))
    }
}

impl EntityPolicy for AccountPolicy {
    type Payload = AccountPayload;

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn tracked_columns(&self) -> &'static [usize] {
        &TRACKED
    }

    fn timing(&self) -> PolicyTiming {
        self.timing
    }

    fn map_row(&self, row: &DecodedRow) -> AccountPayload {
        let m = FieldMapper;
        AccountPayload {
            vencimento: m.parse_date_iso(row, COL_DUE_DATE),
            competencia: m.parse_date_iso(row, COL_PERIOD),
            data_emissao: m.parse_date_iso(row, COL_ISSUE_DATE),
            valor: m.parse_number(row, COL_AMOUNT),
            contato: ContactRef {
                id: m.parse_id(row, COL_CONTACT),
            },
            ocorrencia: Occurrence::default(),
            numero_documento: m.get_string(row, COL_DOCUMENT),
            historico: m.get_string(row, COL_HISTORY),
            forma_pagamento: m.parse_id(row, COL_PAYMENT_METHOD).map(|id| IdRef { id }),
            portador: m.parse_id(row, COL_HOLDER).map(|id| IdRef { id }),
            categoria: m.parse_id(row, COL_CATEGORY).map(|id| IdRef { id }),
        }
    }

    fn required_fields(&self, payload: &AccountPayload) -> Vec<RequiredField> {
        vec![
            RequiredField::text("Vencimento", payload.vencimento.as_deref()),
            RequiredField::text("Competência", payload.competencia.as_deref()),
            RequiredField::text("Data de Emissão", payload.data_emissao.as_deref()),
            RequiredField::number("Valor", payload.valor),
            RequiredField::id("ID do Contato", payload.contato.id),
        ]
    }
}
