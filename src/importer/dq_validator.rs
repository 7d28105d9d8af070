// ==========================================
// Bling 批量导入网关 - 行校验器
// ==========================================
// 职责: 必填字段检查 + 实体专属规则
// 红线: 纯函数,不访问网络、不修改载荷
// ==========================================

use crate::importer::entity_policy::EntityPolicy;
use crate::importer::error::{ImportError, ImportResult};

pub const MISSING_FIELDS_PREFIX: &str = "Campos obrigatórios ausentes";

#[derive(Debug, Clone, Copy, Default)]
pub struct RowValidator;

impl RowValidator {
    /// 校验一行载荷
    ///
    /// # 返回
    /// - Ok(()): 通过
    /// - Err(Validation): 缺失字段列表（按策略声明顺序）或规则错误文本
    pub fn validate<P: EntityPolicy + ?Sized>(
        &self,
        policy: &P,
        payload: &P::Payload,
    ) -> ImportResult<()> {
        let missing: Vec<&str> = policy
            .required_fields(payload)
            .into_iter()
            .filter(|field| !field.present)
            .map(|field| field.label)
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::Validation(format!(
                "{}: {}",
                MISSING_FIELDS_PREFIX,
                missing.join(", ")
            )));
        }

        policy.check_rules(payload).map_err(ImportError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerPayload, ProductPayload};
    use crate::importer::customer_policy::CustomerPolicy;
    use crate::importer::entity_policy::PolicyTiming;
    use crate::importer::product_policy::ProductPolicy;
    use serde_json::json;

    fn product(value: serde_json::Value) -> ProductPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_product_passes() {
        let policy = ProductPolicy::new(PolicyTiming::immediate());
        let payload = product(json!({"nome": "Caneta", "codigo": "C1", "preco": 2.5}));
        assert_eq!(RowValidator.validate(&policy, &payload), Ok(()));
    }

    #[test]
    fn test_missing_fields_joined_in_order() {
        let policy = ProductPolicy::new(PolicyTiming::immediate());
        let payload = product(json!({"codigo": "C1"}));
        assert_eq!(
            RowValidator.validate(&policy, &payload),
            Err(ImportError::Validation(
                "Campos obrigatórios ausentes: Nome, Preço".to_string()
            ))
        );
    }

    #[test]
    fn test_rules_run_after_required_fields() {
        let policy = CustomerPolicy::new(PolicyTiming::immediate());
        let payload: CustomerPayload = serde_json::from_value(json!({
            "nome": "Maria",
            "tipo": "F",
            "numeroDocumento": "123",
            "email": "maria@example.com",
            "endereco": {"geral": {
                "endereco": "Rua A", "numero": "1", "bairro": "Centro",
                "cep": "01001000", "municipio": "São Paulo", "uf": "SP"
            }}
        }))
        .unwrap();
        assert_eq!(
            RowValidator.validate(&policy, &payload).unwrap_err().to_string(),
            "CPF/CNPJ com formato inválido"
        );
    }
}
