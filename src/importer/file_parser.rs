// ==========================================
// Bling 批量导入网关 - 表格解码器实现
// ==========================================
// 阶段 0: 上传字节 → 工作表 → 逐行类型化单元格
// 支持: Excel (.xlsx / .xls)，内存读取,不落盘
// ==========================================

use crate::importer::entity_importer_trait::RowDecoder;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Days, NaiveDate};
use std::io::Cursor;

// ==========================================
// 工作表选择
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// 按位置（0 起）
    Index(usize),
    /// 按名称（完全匹配）
    Name(&'static str),
}

impl SheetSelector {
    fn describe(&self) -> String {
        match self {
            SheetSelector::Index(idx) => format!("#{}", idx + 1),
            SheetSelector::Name(name) => (*name).to_string(),
        }
    }
}

// ==========================================
// 单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// calamine 单元格 → 类型化单元格
    ///
    /// 错误单元格（#N/A 等）视为空；布尔值按文本处理
    pub fn from_data(data: Option<&Data>) -> Self {
        match data {
            None | Some(Data::Empty) | Some(Data::Error(_)) => CellValue::Empty,
            Some(Data::String(s)) => {
                if s.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(s.clone())
                }
            }
            Some(Data::Int(i)) => CellValue::Number(*i as f64),
            Some(Data::Float(f)) => CellValue::Number(*f),
            Some(Data::Bool(b)) => CellValue::Text(b.to_string()),
            Some(Data::DateTime(dt)) => excel_serial_to_date(dt.as_f64())
                .map(CellValue::Date)
                .unwrap_or(CellValue::Number(dt.as_f64())),
            Some(Data::DateTimeIso(s)) => s
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Some(Data::DurationIso(s)) => CellValue::Text(s.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// Excel 序列日期 → 日历日期（1900 日期系统,基准 1899-12-30）
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_days(Days::new(serial.trunc() as u64))
}

/// 列字母 → 列位置（A = 0, Z = 25, AA = 26）
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (ch.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

// ==========================================
// DecodedRow - 一行数据
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRow {
    row_number: usize, // 源表行号（1 起,表头为第 1 行）
    cells: Vec<CellValue>,
}

impl DecodedRow {
    pub fn new(row_number: usize, cells: Vec<CellValue>) -> Self {
        Self { row_number, cells }
    }

    /// 源表行号（1 起）
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// 数据行序号（1 起,不含表头）
    pub fn data_index(&self) -> usize {
        self.row_number.saturating_sub(1)
    }

    /// 按列位置取单元格（0 起,越界视为空）
    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    /// 按列字母取单元格
    pub fn cell_at(&self, letters: &str) -> &CellValue {
        column_index(letters)
            .map(|idx| self.cell(idx))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 指定列是否全部为空
    pub fn is_blank(&self, columns: &[usize]) -> bool {
        columns.iter().all(|&col| self.cell(col).is_empty())
    }
}

// ==========================================
// DecodedSheet - 解码后的工作表
// ==========================================
#[derive(Debug, Clone)]
pub struct DecodedSheet {
    name: String,
    range: Range<Data>,
}

impl DecodedSheet {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 最后一个已用行的行号（含表头）
    pub fn row_count(&self) -> usize {
        self.range.end().map_or(0, |(row, _)| row as usize + 1)
    }

    /// 是否存在数据行（行数 ≤ 1 即只有表头）
    pub fn has_data_rows(&self) -> bool {
        self.row_count() > 1
    }

    /// 消费工作表,按行号顺序惰性产出数据行（从第 2 行开始,含空行）
    pub fn into_rows(self) -> DataRows {
        let last_row = self.row_count();
        let width = self.range.end().map_or(0, |(_, col)| col as usize + 1);
        DataRows {
            range: self.range,
            next_row: 2,
            last_row,
            width,
        }
    }
}

/// 数据行迭代器（一次性）
#[derive(Debug)]
pub struct DataRows {
    range: Range<Data>,
    next_row: usize,
    last_row: usize,
    width: usize,
}

impl Iterator for DataRows {
    type Item = DecodedRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row > self.last_row {
            return None;
        }
        let row_number = self.next_row;
        self.next_row += 1;

        let row_pos = (row_number - 1) as u32;
        let cells = (0..self.width)
            .map(|col| CellValue::from_data(self.range.get_value((row_pos, col as u32))))
            .collect();
        Some(DecodedRow::new(row_number, cells))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last_row + 1).saturating_sub(self.next_row);
        (remaining, Some(remaining))
    }
}

// ==========================================
// Excel 解码器实现
// ==========================================
pub struct ExcelRowDecoder;

impl RowDecoder for ExcelRowDecoder {
    fn decode(&self, content: &[u8], sheet: &SheetSelector) -> ImportResult<DecodedSheet> {
        if content.is_empty() {
            return Err(ImportError::WorkbookOpen("arquivo vazio".to_string()));
        }

        // 自动识别 xlsx / xls
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(content))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            SheetSelector::Index(idx) => sheet_names.get(*idx).cloned(),
            SheetSelector::Name(name) => sheet_names.iter().find(|s| s.as_str() == *name).cloned(),
        }
        .ok_or_else(|| ImportError::SheetNotFound(sheet.describe()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::SheetRead {
                sheet: sheet_name.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(sheet = %sheet_name, "工作表解码完成");
        Ok(DecodedSheet::new(sheet_name, range))
    }
}
