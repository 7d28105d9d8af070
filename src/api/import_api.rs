// ==========================================
// Bling 批量导入网关 - 实体导入 API
// ==========================================
// 职责: 按实体类型分派到对应导入策略
//   - 批量导入: 上传表格 → 逐行报告
//   - 单条创建: JSON → 校验 → 提交一次
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::domain::{EntityKind, ImportResponse, UploadToken};
use crate::importer::{
    AccountPolicy, BatchImporter, CustomerPolicy, EntityPolicy, EntitySubmitter, ProductPolicy,
    RowValidator,
};
use serde_json::Value;
use tracing::{info, instrument};

pub struct ImportApi<S>
where
    S: EntitySubmitter,
{
    importer: BatchImporter<S>,
    products: ProductPolicy,
    customers: CustomerPolicy,
    payables: AccountPolicy,
    receivables: AccountPolicy,
}

impl<S> ImportApi<S>
where
    S: EntitySubmitter,
{
    pub fn new(
        importer: BatchImporter<S>,
        products: ProductPolicy,
        customers: CustomerPolicy,
        payables: AccountPolicy,
        receivables: AccountPolicy,
    ) -> Self {
        Self {
            importer,
            products,
            customers,
            payables,
            receivables,
        }
    }

    /// 按配置构造四种实体策略
    pub fn from_config<C: ImportConfigReader + ?Sized>(
        importer: BatchImporter<S>,
        config: &C,
    ) -> Self {
        Self::new(
            importer,
            ProductPolicy::from_config(config),
            CustomerPolicy::from_config(config),
            AccountPolicy::payable_from_config(config),
            AccountPolicy::receivable_from_config(config),
        )
    }

    /// 批量导入一份上传表格
    ///
    /// # 返回
    /// - Ok: 逐行报告或空表提示
    /// - Err(Import): 文件无法解码
    pub async fn import(
        &self,
        kind: EntityKind,
        content: &[u8],
        token: &UploadToken,
    ) -> ApiResult<ImportResponse> {
        let response = match kind {
            EntityKind::Product => self.importer.import(&self.products, content, token).await,
            EntityKind::Customer => self.importer.import(&self.customers, content, token).await,
            EntityKind::PayableAccount => {
                self.importer.import(&self.payables, content, token).await
            }
            EntityKind::ReceivableAccount => {
                self.importer.import(&self.receivables, content, token).await
            }
        }?;
        Ok(response)
    }

    /// 单条创建
    ///
    /// # 返回
    /// - Ok(Value): 上游创建结果
    /// - Err(InvalidInput): 请求体结构错误
    /// - Err(Import(Validation)): 必填字段缺失或规则不通过
    /// - Err(Import(Upstream*/Transport)): 上游失败
    pub async fn create(
        &self,
        kind: EntityKind,
        body: Value,
        token: &UploadToken,
    ) -> ApiResult<Value> {
        match kind {
            EntityKind::Product => self.create_with(&self.products, body, token).await,
            EntityKind::Customer => self.create_with(&self.customers, body, token).await,
            EntityKind::PayableAccount => self.create_with(&self.payables, body, token).await,
            EntityKind::ReceivableAccount => {
                self.create_with(&self.receivables, body, token).await
            }
        }
    }

    #[instrument(skip_all, fields(kind = %policy.kind()))]
    async fn create_with<P>(&self, policy: &P, body: Value, token: &UploadToken) -> ApiResult<Value>
    where
        P: EntityPolicy,
    {
        let payload: P::Payload = serde_json::from_value(body)
            .map_err(|e| ApiError::InvalidInput(format!("Dados inválidos: {}", e)))?;
        let payload = policy.prepare(payload);

        RowValidator.validate(policy, &payload)?;

        let body = serde_json::to_value(&payload)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let entity = self
            .importer
            .submitter()
            .submit(policy.endpoint_path(), &body, token)
            .await
            .into_result()?;

        info!(endpoint = policy.endpoint_path(), "实体创建成功");
        Ok(entity)
    }
}
