//! Store-only ZIP export of the project.
//!
//! Layout per entry: 30-byte local file header + name + uncompressed data,
//! then one 46-byte central directory record + name per entry, then the
//! single-disk end-of-central-directory record. Method is always 0 (store)
//! and the DOS timestamp is pinned to 1980-01-01 so the archive is a
//! deterministic function of the project.

#[cfg(feature = "napi")]
use napi_derive::napi;

use crate::project::{Project, ProjectEntry};

const LOCAL_FILE_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_DIR_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;

const ZIP_VERSION: u16 = 20;
const METHOD_STORE: u16 = 0;
const DOS_EPOCH_TIME: u16 = 0x0000;
const DOS_EPOCH_DATE: u16 = 0x0021; // 1980-01-01

/// MS-DOS directory attribute bit, set on directory entries.
const EXTERNAL_ATTR_DIR: u32 = 0x10;

struct CentralRecord {
    name: String,
    crc: u32,
    size: u32,
    offset: u32,
    is_dir: bool,
}

pub fn export_archive(project: &Project) -> Vec<u8> {
    let mut out = Vec::new();
    let mut records = Vec::with_capacity(project.len());

    for (path, entry) in project.entries() {
        let (name, data) = match entry {
            ProjectEntry::File(content) => (path.to_string(), content.as_bytes()),
            ProjectEntry::Directory => (format!("{}/", path), &[][..]),
        };

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(data);
        let crc = hasher.finalize();

        let offset = out.len() as u32;
        push_u32(&mut out, LOCAL_FILE_HEADER_SIG);
        push_u16(&mut out, ZIP_VERSION);
        push_u16(&mut out, 0); // general purpose flags
        push_u16(&mut out, METHOD_STORE);
        push_u16(&mut out, DOS_EPOCH_TIME);
        push_u16(&mut out, DOS_EPOCH_DATE);
        push_u32(&mut out, crc);
        push_u32(&mut out, data.len() as u32); // compressed == uncompressed
        push_u32(&mut out, data.len() as u32);
        push_u16(&mut out, name.len() as u16);
        push_u16(&mut out, 0); // extra field length
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);

        records.push(CentralRecord {
            name,
            crc,
            size: data.len() as u32,
            offset,
            is_dir: matches!(entry, ProjectEntry::Directory),
        });
    }

    let central_offset = out.len() as u32;
    for record in &records {
        push_u32(&mut out, CENTRAL_DIR_HEADER_SIG);
        push_u16(&mut out, ZIP_VERSION); // version made by
        push_u16(&mut out, ZIP_VERSION); // version needed
        push_u16(&mut out, 0); // flags
        push_u16(&mut out, METHOD_STORE);
        push_u16(&mut out, DOS_EPOCH_TIME);
        push_u16(&mut out, DOS_EPOCH_DATE);
        push_u32(&mut out, record.crc);
        push_u32(&mut out, record.size);
        push_u32(&mut out, record.size);
        push_u16(&mut out, record.name.len() as u16);
        push_u16(&mut out, 0); // extra field length
        push_u16(&mut out, 0); // comment length
        push_u16(&mut out, 0); // disk number start
        push_u16(&mut out, 0); // internal attributes
        push_u32(&mut out, if record.is_dir { EXTERNAL_ATTR_DIR } else { 0 });
        push_u32(&mut out, record.offset);
        out.extend_from_slice(record.name.as_bytes());
    }
    let central_size = out.len() as u32 - central_offset;

    push_u32(&mut out, END_OF_CENTRAL_DIR_SIG);
    push_u16(&mut out, 0); // this disk
    push_u16(&mut out, 0); // central directory disk
    push_u16(&mut out, records.len() as u16);
    push_u16(&mut out, records.len() as u16);
    push_u32(&mut out, central_size);
    push_u32(&mut out, central_offset);
    push_u16(&mut out, 0); // comment length

    out
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

#[cfg(feature = "napi")]
#[napi]
pub fn export_archive_native(
    files: serde_json::Value,
) -> napi::Result<napi::bindgen_prelude::Buffer> {
    let project =
        Project::from_json(&files).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(export_archive(&project).into())
}
