// ==========================================
// 脚本化上游提交器 - 用于导入编排测试
// ==========================================
// 按顺序返回预设结果；脚本耗尽后一律返回创建成功
// 记录每次调用（端点 / 载荷 / 令牌）以便断言调用次数
// ==========================================

use async_trait::async_trait;
use bling_import_bff::domain::UploadToken;
use bling_import_bff::importer::{EntitySubmitter, SubmitOutcome};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub payload: Value,
    pub token: String,
    pub at: Instant,
}

#[derive(Default)]
pub struct ScriptedSubmitter {
    script: Mutex<VecDeque<SubmitOutcome>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(outcomes: Vec<SubmitOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EntitySubmitter for ScriptedSubmitter {
    async fn submit(
        &self,
        endpoint_path: &str,
        payload: &Value,
        token: &UploadToken,
    ) -> SubmitOutcome {
        let id = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                endpoint: endpoint_path.to_string(),
                payload: payload.clone(),
                token: token.expose().to_string(),
                at: Instant::now(),
            });
            calls.len()
        };
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| SubmitOutcome::Created(json!({"data": {"id": id}})))
    }
}

/// 限流响应
pub fn throttled() -> SubmitOutcome {
    SubmitOutcome::Rejected {
        status: 429,
        body: r#"{"error":{"type":"TOO_MANY_REQUESTS","message":"Limite de requisições atingido"}}"#
            .to_string(),
    }
}

/// 普通拒绝响应
pub fn rejected(body: &str) -> SubmitOutcome {
    SubmitOutcome::Rejected {
        status: 400,
        body: body.to_string(),
    }
}

/// 创建成功响应
pub fn created(id: i64) -> SubmitOutcome {
    SubmitOutcome::Created(json!({"data": {"id": id}}))
}
