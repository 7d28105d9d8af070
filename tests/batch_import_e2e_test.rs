// ==========================================
// 批量导入端到端测试
// ==========================================
// 测试范围:
// 1. 全部成功 / 校验失败不访问网络 / 只有表头
// 2. 限流重试恰好一次；普通失败不重试
// 3. 报告计数与行序
// 4. 提交间隔（虚拟时间）
// ==========================================

mod helpers;

use bling_import_bff::domain::{EntityKind, ImportResponse, UploadToken};
use bling_import_bff::importer::{
    AccountPolicy, BatchImporter, CustomerPolicy, ImportError, PolicyTiming, ProductPolicy,
    SubmitOutcome,
};
use bling_import_bff::logging;
use helpers::mock_submitter::{created, rejected, throttled, ScriptedSubmitter};
use helpers::xlsx_builder::{
    account_header, customer_header, customer_row, e, n, product_header, t, XlsxBuilder,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn token() -> UploadToken {
    UploadToken::new("test-access-token-9f3a").unwrap()
}

fn importer(submitter: &Arc<ScriptedSubmitter>) -> BatchImporter<Arc<ScriptedSubmitter>> {
    BatchImporter::with_excel(submitter.clone())
}

fn report_json(response: &ImportResponse) -> Value {
    serde_json::to_value(response).unwrap()
}

fn products(rows: Vec<Vec<helpers::xlsx_builder::Cell>>) -> Vec<u8> {
    let mut all = vec![product_header()];
    all.extend(rows);
    XlsxBuilder::new().sheet("Produtos", all).build()
}

// ==========================================
// 基本场景
// ==========================================

#[tokio::test]
async fn test_all_rows_succeed() {
    logging::init_test();
    let submitter = Arc::new(ScriptedSubmitter::new());
    let content = products(vec![
        vec![t("Caneta Azul"), t("CAN-001"), n(2.5)],
        vec![t("Lápis"), t("LAP-001"), n(1.2), t("Grafite HB"), t("CX")],
    ]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let body = report_json(&response);
    assert_eq!(body["message"], "Processamento concluído");
    assert_eq!(body["total"], 2);
    assert_eq!(body["success"], 2);
    assert_eq!(body["errors"], json!([]));
    assert_eq!(
        body["processedItems"][0],
        json!({"index": 1, "status": "success", "produto": {"data": {"id": 1}}})
    );
    assert_eq!(body["processedItems"][1]["index"], 2);

    let calls = submitter.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.endpoint == "produtos"));
    assert!(calls.iter().all(|c| c.token == "test-access-token-9f3a"));
    assert_eq!(
        calls[0].payload,
        json!({
            "nome": "Caneta Azul",
            "codigo": "CAN-001",
            "preco": 2.5,
            "tipo": "P",
            "situacao": "A",
            "formato": "S",
            "unidade": "UN"
        })
    );
    assert_eq!(calls[1].payload["descricao"], "Grafite HB");
    assert_eq!(calls[1].payload["unidade"], "CX");
}

#[tokio::test]
async fn test_missing_required_field_never_reaches_network() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let content = products(vec![vec![t("Caneta"), t("C1")]]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let body = report_json(&response);
    assert_eq!(body["total"], 1);
    assert_eq!(body["success"], 0);
    assert_eq!(
        body["errors"],
        json!([{"index": 1, "row": 2, "error": "Campos obrigatórios ausentes: Preço"}])
    );
    assert_eq!(
        body["processedItems"],
        json!([{"index": 1, "status": "error", "error": "Campos obrigatórios ausentes: Preço"}])
    );
    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test]
async fn test_zero_amount_account_is_missing_value() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let content = XlsxBuilder::new()
        .sheet(
            "Contas",
            vec![
                account_header(),
                vec![n(45400.0), n(45383.0), n(45383.0), n(0.0), n(123.0)],
            ],
        )
        .build();

    let response = importer(&submitter)
        .import(&AccountPolicy::payable(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let report = response.report().unwrap();
    assert_eq!(report.errors[0].error, "Campos obrigatórios ausentes: Valor");
    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test]
async fn test_header_only_returns_empty_sheet_notice() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let content = products(vec![]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    assert_eq!(response, ImportResponse::empty_sheet(EntityKind::Product));
    let body = report_json(&response);
    assert_eq!(body["message"], "Planilha vazia");
    assert!(body["error"].as_str().unwrap().contains("produtos"));
    assert!(body.get("total").is_none());
    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test]
async fn test_corrupt_file_fails_whole_batch() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let result = importer(&submitter)
        .import(
            &ProductPolicy::new(PolicyTiming::immediate()),
            b"not a spreadsheet",
            &token(),
        )
        .await;

    assert!(matches!(result, Err(ref e) if e.is_decode_error()));
    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test]
async fn test_customer_sheet_must_be_named_dados() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let content = XlsxBuilder::new()
        .sheet(
            "Planilha1",
            vec![customer_header(), customer_row("Maria", "123.456.789-09")],
        )
        .build();

    let result = importer(&submitter)
        .import(&CustomerPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await;

    assert_eq!(result, Err(ImportError::SheetNotFound("Dados".into())));
}

// ==========================================
// 限流与失败隔离
// ==========================================

#[tokio::test]
async fn test_throttled_then_created_retries_exactly_once() {
    let submitter = Arc::new(ScriptedSubmitter::with_script(vec![
        throttled(),
        created(55),
    ]));
    let content = products(vec![vec![t("Caneta"), t("C1"), n(2.5)]]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let report = response.report().unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.success, 1);
    assert!(report.errors.is_empty());

    let calls = submitter.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].payload, calls[1].payload);
    assert_eq!(
        report_json(&response)["processedItems"][0]["produto"],
        json!({"data": {"id": 55}})
    );
}

#[tokio::test]
async fn test_throttled_twice_records_retry_failure() {
    let submitter = Arc::new(ScriptedSubmitter::with_script(vec![
        throttled(),
        throttled(),
    ]));
    let content = products(vec![
        vec![t("Caneta"), t("C1"), n(2.5)],
        vec![t("Lápis"), t("L1"), n(1.0)],
    ]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let report = response.report().unwrap();
    assert_eq!(report.total, 2);
    assert_eq!(report.success, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].index, 1);
    assert!(report.errors[0].error.contains("TOO_MANY_REQUESTS"));
    // 第 1 行: 首次 + 重试；第 2 行: 一次
    assert_eq!(submitter.call_count(), 3);
}

#[tokio::test]
async fn test_plain_rejection_is_not_retried_and_batch_continues() {
    let upstream_error = r#"{"error":{"type":"VALIDATION_ERROR","message":"Código já cadastrado"}}"#;
    let submitter = Arc::new(ScriptedSubmitter::with_script(vec![
        created(1),
        rejected(upstream_error),
    ]));
    let content = products(vec![
        vec![t("Caneta"), t("C1"), n(2.5)],
        vec![t("Caneta"), t("C1"), n(2.5)],
        vec![t("Borracha"), t("B1")],
        vec![t("Régua"), t("R1"), n(3.0)],
    ]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let report = response.report().unwrap();
    assert_eq!(report.total, 4);
    assert_eq!(report.success, 2);
    assert_eq!(report.success + report.errors.len(), report.total);

    assert_eq!(report.errors[0].index, 2);
    assert_eq!(report.errors[0].row, 3);
    assert_eq!(report.errors[0].error, upstream_error);
    assert_eq!(report.errors[1].index, 3);
    assert_eq!(report.errors[1].error, "Campos obrigatórios ausentes: Preço");

    // 第 3 行未提交；第 2 行拒绝后不重试
    assert_eq!(submitter.call_count(), 3);

    let indices: Vec<u64> = report_json(&response)["processedItems"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_transport_failure_is_recorded_without_retry() {
    let submitter = Arc::new(ScriptedSubmitter::with_script(vec![
        created(1),
        SubmitOutcome::Transport("connection reset".to_string()),
        created(3),
    ]));
    let content = products(vec![
        vec![t("Caneta"), t("C1"), n(2.5)],
        vec![t("Lápis"), t("L1"), n(1.2)],
        vec![t("Régua"), t("R1"), n(3.0)],
    ]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let report = response.report().unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.success, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].index, 2);
    assert_eq!(report.errors[0].row, 3);
    assert_eq!(report.errors[0].error, "connection reset");

    // 传输失败不重试,后续行照常提交
    assert_eq!(submitter.call_count(), 3);

    let indices: Vec<u64> = report_json(&response)["processedItems"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_blank_rows_skipped_without_counting() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let content = products(vec![
        vec![t("Caneta"), t("C1"), n(2.5)],
        vec![e(), e(), e(), t("só descrição")],
        vec![],
        vec![t("Lápis"), t("L1"), n(1.0)],
    ]);

    let response = importer(&submitter)
        .import(&ProductPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let body = report_json(&response);
    assert_eq!(body["total"], 2);
    assert_eq!(body["success"], 2);
    assert_eq!(body["processedItems"][0]["index"], 1);
    assert_eq!(body["processedItems"][1]["index"], 4);
    assert_eq!(submitter.call_count(), 2);
}

// ==========================================
// 各实体映射
// ==========================================

#[tokio::test]
async fn test_customer_import_builds_contact_payload() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let mut invalid = customer_row("Empresa X", "12.345.678/0001-95");
    invalid[1] = t("Empresa");
    let content = XlsxBuilder::new()
        .sheet("Instruções", vec![vec![t("Use a aba Dados")]])
        .sheet(
            "Dados",
            vec![
                customer_header(),
                customer_row("Maria Silva", "123.456.789-09"),
                invalid,
            ],
        )
        .build();

    let response = importer(&submitter)
        .import(&CustomerPolicy::new(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let body = report_json(&response);
    assert_eq!(body["total"], 2);
    assert_eq!(body["success"], 1);
    assert_eq!(
        body["errors"][0]["error"],
        r#"Tipo de pessoa inválido. Use "Física" ou "Jurídica""#
    );
    assert!(body["processedItems"][0].get("contato").is_some());

    let calls = submitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].endpoint, "contatos");
    let payload = &calls[0].payload;
    assert_eq!(payload["tipo"], "F");
    assert_eq!(payload["numeroDocumento"], "12345678909");
    assert_eq!(payload["situacao"], "A");
    assert_eq!(payload["endereco"]["geral"]["cep"], "01001000");
    assert_eq!(payload["endereco"]["cobranca"], payload["endereco"]["geral"]);
    assert!(payload.get("financeiro").is_none());
}

#[tokio::test]
async fn test_receivable_import_posts_to_receivable_endpoint() {
    let submitter = Arc::new(ScriptedSubmitter::new());
    let content = XlsxBuilder::new()
        .sheet(
            "Contas",
            vec![
                account_header(),
                vec![
                    n(45376.0),
                    t("2024-03-01"),
                    n(45352.0),
                    n(199.9),
                    n(16993759185.0),
                    t("NF-10"),
                    t("Venda balcão"),
                    n(4.0),
                    n(5.0),
                    n(6.0),
                ],
            ],
        )
        .build();

    let response = importer(&submitter)
        .import(&AccountPolicy::receivable(PolicyTiming::immediate()), &content, &token())
        .await
        .unwrap();

    let report = response.report().unwrap();
    assert_eq!(report.success, 1);
    assert!(report_json(&response)["processedItems"][0].get("conta").is_some());

    let calls = submitter.calls();
    assert_eq!(calls[0].endpoint, "contas/receber");
    assert_eq!(
        calls[0].payload,
        json!({
            "vencimento": "2024-03-25",
            "competencia": "2024-03-01",
            "dataEmissao": "2024-03-01",
            "valor": 199.9,
            "contato": {"id": 16993759185i64},
            "ocorrencia": {"tipo": 1},
            "numeroDocumento": "NF-10",
            "historico": "Venda balcão",
            "formaPagamento": {"id": 4},
            "portador": {"id": 5},
            "categoria": {"id": 6}
        })
    );
}

// ==========================================
// 提交间隔与冷却（虚拟时间）
// ==========================================

#[tokio::test(start_paused = true)]
async fn test_pacing_before_each_submission_and_cooldown_before_retry() {
    let submitter = Arc::new(ScriptedSubmitter::with_script(vec![
        created(1),
        throttled(),
        created(2),
    ]));
    let content = products(vec![
        vec![t("Caneta"), t("C1"), n(2.5)],
        vec![t("Lápis"), t("L1"), n(1.0)],
    ]);
    let policy = ProductPolicy::new(PolicyTiming::new(
        Duration::from_millis(350),
        Duration::from_millis(1000),
    ));

    let started = tokio::time::Instant::now();
    let response = importer(&submitter)
        .import(&policy, &content, &token())
        .await
        .unwrap();
    assert_eq!(response.report().unwrap().success, 2);

    let offsets: Vec<Duration> = submitter
        .calls()
        .iter()
        .map(|c| c.at.duration_since(started))
        .collect();
    let expected = [350u64, 700, 1700];
    assert_eq!(offsets.len(), expected.len());
    for (offset, expected_ms) in offsets.iter().zip(expected) {
        let expected = Duration::from_millis(expected_ms);
        assert!(
            *offset >= expected && *offset < expected + Duration::from_millis(10),
            "offset {:?} != {:?}",
            offset,
            expected
        );
    }
}
