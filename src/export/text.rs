//! Plain text and CSV rendering

use super::types::ExportError;

/// `# title`, optional `key: value` block, then the content
pub fn render_txt(title: &str, metadata: &[(String, String)], content: &str) -> Vec<u8> {
    let mut out = format!("# {}\n\n", title);

    if !metadata.is_empty() {
        for (key, value) in metadata {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        out.push('\n');
    }

    out.push_str(content);
    out.into_bytes()
}

/// `Filename,Content` header and one data row, followed by a metadata block
pub fn render_csv(
    title: &str,
    metadata: &[(String, String)],
    content: &str,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer(Vec::new());
    writer.write_record(["Filename", "Content"])?;
    writer.write_record([title, content])?;
    let mut out = finish(writer)?;

    if !metadata.is_empty() {
        // csv quotes a lone empty field, so the separator row is written raw
        out.extend_from_slice(b"\r\n");

        let mut writer = csv_writer(out);
        writer.write_record(["Metadata"])?;
        for (key, value) in metadata {
            writer.write_record([key.as_str(), value.as_str()])?;
        }
        out = finish(writer)?;
    }

    Ok(out)
}

fn csv_writer(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(buffer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
