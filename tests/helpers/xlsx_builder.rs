// ==========================================
// 测试用 xlsx 构造器
// ==========================================
// 职责: 在内存中生成最小可读的 xlsx 文件（内联字符串 + 数值单元格）
// ==========================================

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 单元格
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

pub fn t(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

pub fn n(value: f64) -> Cell {
    Cell::Number(value)
}

pub fn e() -> Cell {
    Cell::Empty
}

/// 工作簿构造器
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个工作表（第一行为表头）
    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let mut add = |name: &str, content: String| {
            writer.start_file(name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        };

        add("[Content_Types].xml", self.content_types());
        add("_rels/.rels", ROOT_RELS.to_string());
        add("xl/workbook.xml", self.workbook());
        add("xl/_rels/workbook.xml.rels", self.workbook_rels());
        for (idx, (_, rows)) in self.sheets.iter().enumerate() {
            add(
                &format!("xl/worksheets/sheet{}.xml", idx + 1),
                worksheet(rows),
            );
        }

        writer.finish().unwrap().into_inner()
    }

    fn content_types(&self) -> String {
        let overrides: String = (1..=self.sheets.len())
            .map(|i| {
                format!(
                    r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                    i
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{}</Types>"#,
            overrides
        )
    }

    fn workbook(&self) -> String {
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(idx, (name, _))| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    escape(name),
                    idx + 1,
                    idx + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheets
        )
    }

    fn workbook_rels(&self) -> String {
        let rels: String = (1..=self.sheets.len())
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    i, i
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        )
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

fn worksheet(rows: &[Vec<Cell>]) -> String {
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 1;
        data.push_str(&format!(r#"<row r="{}">"#, row_number));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letters(c), row_number);
            match cell {
                Cell::Text(value) => data.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    reference,
                    escape(value)
                )),
                Cell::Number(value) => {
                    data.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value))
                }
                Cell::Empty => {}
            }
        }
        data.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        data
    )
}

fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ==========================================
// 各实体的标准表头
// ==========================================

pub fn product_header() -> Vec<Cell> {
    vec![
        t("Nome*"),
        t("Código*"),
        t("Preço*"),
        t("Descrição"),
        t("Unidade"),
    ]
}

pub fn account_header() -> Vec<Cell> {
    vec![
        t("Vencimento*"),
        t("Competência*"),
        t("Data de Emissão*"),
        t("Valor*"),
        t("ID do Contato*"),
        t("Nº Documento"),
        t("Histórico"),
        t("Forma de Pagamento"),
        t("Portador"),
        t("Categoria"),
    ]
}

pub fn customer_header() -> Vec<Cell> {
    [
        "Nome*", "Tipo*", "CPF/CNPJ*", "Código", "IE", "RG", "Órgão Emissor", "Email*",
        "Telefone", "Celular", "Fantasia", "Endereço*", "Número*", "Complemento", "Bairro*",
        "CEP*", "Município*", "UF*", "Nascimento", "Sexo", "Naturalidade", "Limite",
        "Condição", "Categoria", "Vendedor", "País",
    ]
    .iter()
    .map(|h| t(h))
    .collect()
}

/// 一行完整的联系人数据（自然人）
pub fn customer_row(name: &str, document: &str) -> Vec<Cell> {
    let mut row = vec![e(); 26];
    row[0] = t(name);
    row[1] = t("Física");
    row[2] = t(document);
    row[7] = t("cliente@example.com");
    row[11] = t("Rua das Flores");
    row[12] = t("100");
    row[14] = t("Centro");
    row[15] = t("01001-000");
    row[16] = t("São Paulo");
    row[17] = t("SP");
    row
}
