// ==========================================
// Bling 批量导入网关 - 联系人导入策略
// ==========================================
// 工作表: Dados
// 列（0 起）:
//   0 名称* | 1 人员类型* | 2 CPF/CNPJ* | 3 编码 | 4 IE | 5 RG | 6 发证机关
//   7 邮箱* | 8 电话 | 9 手机 | 10 商号
//   11 地址* | 12 门牌号* | 13 补充 | 14 街区* | 15 邮编* | 16 城市* | 17 州*
//   18 出生日期 | 19 性别 | 20 籍贯
//   21 信用额度 | 22 付款条件 | 23 分类 ID | 24 销售员 ID | 25 国家
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{
    AdditionalData, Address, CountryRef, CustomerAddresses, CustomerPayload, EntityKind,
    FinancialData, IdRef,
};
use crate::importer::entity_policy::{EntityPolicy, PolicyTiming, RequiredField};
use crate::importer::field_mapper::{digits_only, FieldMapper};
use crate::importer::file_parser::{DecodedRow, SheetSelector};

pub const CUSTOMER_SHEET: &str = "Dados";

const TRACKED: [usize; 3] = [0, 1, 2];

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

#[derive(Debug, Clone)]
pub struct CustomerPolicy {
    timing: PolicyTiming,
}

impl CustomerPolicy {
    pub fn new(timing: PolicyTiming) -> Self {
        Self { timing }
    }

    pub fn from_config<C: ImportConfigReader + ?Sized>(config: &C) -> Self {
        Self::new(PolicyTiming::from_config(config, EntityKind::Customer))
    }
}

impl Default for CustomerPolicy {
    fn default() -> Self {
        Self::from_config(&crate::config::ImportConfig::default())
    }
}

/// 人员类型标准化
///
/// "Física"/"Fisica"/"F" → F，"Jurídica"/"Juridica"/"J" → J（不区分大小写与重音）；
/// 其他内容原样保留,由规则校验拒绝
pub fn normalize_person_type(raw: &str) -> String {
    let folded: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'í' | 'ì' | 'î' | 'ï' => 'i',
            other => other,
        })
        .collect();
    match folded.as_str() {
        "f" | "fisica" => "F".to_string(),
        "j" | "juridica" => "J".to_string(),
        _ => raw.trim().to_string(),
    }
}

/// 地址清洗：CEP 只保留数字,UF 转大写
fn clean_address(address: Address) -> Address {
    Address {
        cep: address.cep.as_deref().and_then(digits_only),
        uf: address.uf.map(|uf| uf.trim().to_uppercase()),
        ..address
    }
}

impl EntityPolicy for CustomerPolicy {
    type Payload = CustomerPayload;

    fn kind(&self) -> EntityKind {
        EntityKind::Customer
    }

    fn sheet(&self) -> SheetSelector {
        SheetSelector::Name(CUSTOMER_SHEET)
    }

    fn tracked_columns(&self) -> &'static [usize] {
        &TRACKED
    }

    fn timing(&self) -> PolicyTiming {
        self.timing
    }

    fn map_row(&self, row: &DecodedRow) -> CustomerPayload {
        let m = FieldMapper;

        let geral = Address {
            endereco: m.get_string(row, 11),
            numero: m.get_string(row, 12),
            complemento: m.get_string(row, 13),
            bairro: m.get_string(row, 14),
            cep: m.get_digits(row, 15),
            municipio: m.get_string(row, 16),
            uf: m.get_string(row, 17).map(|uf| uf.to_uppercase()),
        };

        let additional = AdditionalData {
            data_nascimento: m.parse_date_iso(row, 18),
            sexo: m.get_string(row, 19),
            naturalidade: m.get_string(row, 20),
        };

        let financial = FinancialData {
            limite_credito: m.parse_number(row, 21).filter(|v| v.is_finite()),
            condicao_pagamento: m.get_string(row, 22),
            categoria: m.parse_id(row, 23).map(|id| IdRef { id }),
        };

        CustomerPayload {
            nome: m.get_string(row, 0),
            tipo: m.get_string(row, 1).map(|t| normalize_person_type(&t)),
            numero_documento: m.get_digits(row, 2),
            situacao: "A".to_string(),
            codigo: m.get_string(row, 3),
            indicador_ie: None,
            ie: m.get_string(row, 4),
            rg: m.get_string(row, 5),
            orgao_emissor: m.get_string(row, 6),
            email: m.get_string(row, 7),
            telefone: m.get_string(row, 8),
            celular: m.get_string(row, 9),
            fantasia: m.get_string(row, 10),
            endereco: CustomerAddresses {
                geral,
                cobranca: None,
            },
            dados_adicionais: (additional != AdditionalData::default()).then_some(additional),
            financeiro: (financial != FinancialData::default()).then_some(financial),
            vendedor: m.parse_id(row, 24).map(|id| IdRef { id }),
            pais: m.get_string(row, 25).map(|nome| CountryRef { nome }),
        }
        .normalized()
    }

    fn prepare(&self, payload: CustomerPayload) -> CustomerPayload {
        let tipo = payload.tipo.as_deref().map(normalize_person_type);
        let documento = payload.numero_documento.as_deref().and_then(digits_only);
        let endereco = CustomerAddresses {
            geral: clean_address(payload.endereco.geral),
            cobranca: payload.endereco.cobranca.map(clean_address),
        };
        CustomerPayload {
            tipo,
            numero_documento: documento,
            endereco,
            ..payload
        }
        .normalized()
    }

    fn required_fields(&self, payload: &CustomerPayload) -> Vec<RequiredField> {
        let address = &payload.endereco.geral;
        vec![
            RequiredField::text("Nome", payload.nome.as_deref()),
            RequiredField::text("Tipo de Pessoa", payload.tipo.as_deref()),
            RequiredField::text("CPF/CNPJ", payload.numero_documento.as_deref()),
            RequiredField::text("Email", payload.email.as_deref()),
            RequiredField::text("Endereço", address.endereco.as_deref()),
            RequiredField::text("Número", address.numero.as_deref()),
            RequiredField::text("Bairro", address.bairro.as_deref()),
            RequiredField::text("CEP", address.cep.as_deref()),
            RequiredField::text("Município", address.municipio.as_deref()),
            RequiredField::text("UF", address.uf.as_deref()),
        ]
    }

    fn check_rules(&self, payload: &CustomerPayload) -> Result<(), String> {
        let expected_len = match payload.tipo.as_deref() {
            Some("F") => CPF_LEN,
            Some("J") => CNPJ_LEN,
            _ => return Err(r#"Tipo de pessoa inválido. Use "Física" ou "Jurídica""#.to_string()),
        };
        let document_len = payload
            .numero_documento
            .as_deref()
            .map_or(0, |d| d.len());
        if document_len != expected_len {
            return Err("CPF/CNPJ com formato inválido".to_string());
        }
        Ok(())
    }
}
