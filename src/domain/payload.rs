// ==========================================
// Bling 批量导入网关 - 上游实体载荷
// ==========================================
// 对齐: Bling API v3 请求体字段名（camelCase / 葡语）
// 红线: 未填写的可选字段整体省略,不输出 null
// ==========================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// 实体载荷标记 trait
///
/// 每种实体有自己的必填/可选字段集合,由对应的导入策略解释。
pub trait EntityPayload:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
}

fn default_product_type() -> String {
    "P".to_string()
}

fn default_active() -> String {
    "A".to_string()
}

fn default_format() -> String {
    "S".to_string()
}

fn default_unit() -> String {
    "UN".to_string()
}

fn default_occurrence_type() -> u8 {
    1
}

// ==========================================
// ProductPayload - 产品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub codigo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preco: Option<f64>,
    #[serde(default = "default_product_type")]
    pub tipo: String, // 固定 P（产品）
    #[serde(default = "default_active")]
    pub situacao: String, // 固定 A（启用）
    #[serde(default = "default_format")]
    pub formato: String, // 固定 S（简单）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub descricao: Option<String>,
    #[serde(default = "default_unit")]
    pub unidade: String,
}

impl EntityPayload for ProductPayload {}

// ==========================================
// CustomerPayload - 联系人
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub endereco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub numero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub complemento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bairro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cep: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub municipio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uf: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerAddresses {
    #[serde(default)]
    pub geral: Address,
    // 未单独提供时镜像 geral
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cobranca: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalData {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data_nascimento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sexo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub naturalidade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limite_credito: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub condicao_pagamento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub categoria: Option<IdRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRef {
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tipo: Option<String>, // F = 自然人, J = 法人
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub numero_documento: Option<String>, // CPF/CNPJ,仅数字
    #[serde(default = "default_active")]
    pub situacao: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub codigo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub indicador_ie: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub orgao_emissor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub celular: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fantasia: Option<String>,
    #[serde(default)]
    pub endereco: CustomerAddresses,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dados_adicionais: Option<AdditionalData>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub financeiro: Option<FinancialData>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vendedor: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pais: Option<CountryRef>,
}

impl CustomerPayload {
    /// 补齐派生字段：收款地址镜像通用地址、有 IE 时标记 ICMS 纳税人
    pub fn normalized(mut self) -> Self {
        if self.endereco.cobranca.is_none() {
            self.endereco.cobranca = Some(self.endereco.geral.clone());
        }
        if self.ie.is_some() && self.indicador_ie.is_none() {
            self.indicador_ie = Some(1);
        }
        self
    }
}

impl EntityPayload for CustomerPayload {}

// ==========================================
// AccountPayload - 应付/应收账款
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRef {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    #[serde(default = "default_occurrence_type")]
    pub tipo: u8, // 1 = 单次
}

impl Default for Occurrence {
    fn default() -> Self {
        Self {
            tipo: default_occurrence_type(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vencimento: Option<String>, // 到期日 YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub competencia: Option<String>, // 会计期间 YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data_emissao: Option<String>, // 开票日 YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub valor: Option<f64>,
    #[serde(default)]
    pub contato: ContactRef,
    #[serde(default)]
    pub ocorrencia: Occurrence,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub numero_documento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub historico: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub forma_pagamento: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub portador: Option<IdRef>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub categoria: Option<IdRef>,
}

impl EntityPayload for AccountPayload {}
