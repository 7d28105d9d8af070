// ==========================================
// Bling 批量导入网关 - 单元格类型转换
// ==========================================
// 职责: 单元格 → 载荷字段的统一转换规则
//   - 日期单元格 → YYYY-MM-DD
//   - 数值字段 → f64（无法解析时为 NaN,交给校验器判定）
//   - 纯数字标识（CPF/CNPJ、CEP）→ 去除非数字字符
//   - 空单元格 → None（载荷中整体省略）
// ==========================================

use crate::importer::file_parser::{excel_serial_to_date, CellValue, DecodedRow};

pub struct FieldMapper;

impl FieldMapper {
    /// 提取文本（去首尾空白；数值按整数优先格式化）
    pub fn get_string(&self, row: &DecodedRow, column: usize) -> Option<String> {
        match row.cell(column) {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// 解析数值
    ///
    /// # 返回
    /// - None: 单元格为空
    /// - Some(NaN): 非数值内容
    pub fn parse_number(&self, row: &DecodedRow, column: usize) -> Option<f64> {
        match row.cell(column) {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => Some(s.trim().parse::<f64>().unwrap_or(f64::NAN)),
            CellValue::Date(_) => Some(f64::NAN),
        }
    }

    /// 提取纯数字标识（剔除所有非数字字符,剔除后为空视为缺失）
    pub fn get_digits(&self, row: &DecodedRow, column: usize) -> Option<String> {
        self.get_string(row, column).and_then(|s| digits_only(&s))
    }

    /// 解析日期为 ISO 字符串
    ///
    /// 数值单元格按 Excel 序列日期解释；文本原样保留
    pub fn parse_date_iso(&self, row: &DecodedRow, column: usize) -> Option<String> {
        match row.cell(column) {
            CellValue::Empty => None,
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            CellValue::Number(n) => excel_serial_to_date(*n)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .or_else(|| Some(format_number(*n))),
            CellValue::Text(_) => self.get_string(row, column),
        }
    }

    /// 解析整数 ID（非整数内容视为缺失）
    pub fn parse_id(&self, row: &DecodedRow, column: usize) -> Option<i64> {
        let value = self.parse_number(row, column)?;
        if value.is_finite() && value.fract() == 0.0 {
            Some(value as i64)
        } else {
            None
        }
    }
}

/// 剔除所有非数字字符；结果为空时返回 None
pub fn digits_only(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    (!digits.is_empty()).then_some(digits)
}

/// 数值格式化：整数不带小数部分
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
