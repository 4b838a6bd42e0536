// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、CSV 内容与最小 XLSX 工作簿构造
// ==========================================

#![allow(dead_code)]

use broker_crm::db::open_sqlite_connection;
use std::error::Error;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// 导入示例中使用的表头（必填字段，列序与模板一致）
pub const REQUIRED_HEADER: &str =
    "nom,prenom,email,telephone,date_naissance,numero_secu,adresse,situation_familiale";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(TempDir, String), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("crm_test.db").to_string_lossy().to_string();

    // 建表
    open_sqlite_connection(&db_path)?;

    Ok((dir, db_path))
}

/// 完整有效的一行（与 REQUIRED_HEADER 对应）
pub fn valid_row(last_name: &str, national_id: &str) -> String {
    format!(
        "{},Jean,{}@email.com,0123456789,1980-01-15,{},123 Rue de la Paix 75001 Paris,marie",
        last_name,
        last_name.to_lowercase(),
        national_id
    )
}

/// 拼接 CSV 内容（表头 + 行，以换行结尾）
pub fn csv_content(header: &str, rows: &[String]) -> String {
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content
}

/// 在目录中写入暂存文件
pub fn write_upload(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write upload");
    path
}

// ==========================================
// 最小 XLSX 构造
// ==========================================

/// 工作表单元格
#[derive(Debug, Clone)]
pub enum XCell {
    Text(String),
    Number(f64),
    /// Excel 日期序列号（1900 系统），以日期格式样式写入
    Date(f64),
    Empty,
}

impl XCell {
    pub fn text(value: &str) -> Self {
        XCell::Text(value.to_string())
    }
}

/// 一行文本单元格
pub fn text_row(values: &[&str]) -> Vec<XCell> {
    values
        .iter()
        .map(|v| if v.is_empty() { XCell::Empty } else { XCell::text(v) })
        .collect()
}

fn column_letter(idx: usize) -> String {
    let mut n = idx + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn sheet_xml(rows: &[Vec<XCell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        let row_num = r + 1;
        xml.push_str(&format!(r#"<row r="{}">"#, row_num));
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", column_letter(c), row_num);
            match cell {
                XCell::Text(s) => xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    cell_ref,
                    escape_xml(s)
                )),
                XCell::Number(n) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, n))
                }
                XCell::Date(serial) => xml.push_str(&format!(
                    r#"<c r="{}" s="1"><v>{}</v></c>"#,
                    cell_ref, serial
                )),
                XCell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// 构造 XLSX 字节（工作表按给定顺序，第一个为首个工作表）
pub fn build_xlsx(sheets: &[(&str, Vec<Vec<XCell>>)]) -> Vec<u8> {
    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut workbook_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            n
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(name),
            n,
            n
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
    }
    let styles_id = sheets.len() + 1;
    workbook_rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        styles_id
    ));

    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str("</Relationships>");

    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    // 样式 1 = numFmtId 14（短日期）
    let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
        let mut add = |path: &str, body: &str| {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
            zip.start_file(path, options).expect("start zip entry");
            zip.write_all(body.as_bytes()).expect("write zip entry");
        };

        add("[Content_Types].xml", &content_types);
        add("_rels/.rels", root_rels);
        add("xl/workbook.xml", &workbook);
        add("xl/_rels/workbook.xml.rels", &workbook_rels);
        add("xl/styles.xml", styles);
        for (i, (_, rows)) in sheets.iter().enumerate() {
            add(&format!("xl/worksheets/sheet{}.xml", i + 1), &sheet_xml(rows));
        }

        zip.finish().expect("finish zip");
    }
    buf
}
