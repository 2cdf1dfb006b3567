use std::io::{self, Read, Write};
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

/// 魔数常量 - 用于识别目录快照文件
pub const MAGIC_BYTES: &[u8] = b"SCTLG"; // Site CaTaLoG

/// 当前写入的快照版本
pub const SNAPSHOT_VERSION: [u8; 2] = [1, 0];

/// 头部长度：魔数 + 版本号 + 原始数据大小
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

/// 数据是否以快照魔数开头
pub fn is_snapshot(data: &[u8]) -> bool {
    data.starts_with(MAGIC_BYTES)
}

/// 将对象写成压缩快照
pub fn to_snapshot<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    let binary = bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("序列化失败: {}", e)))?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&SNAPSHOT_VERSION);
    output.extend_from_slice(&(binary.len() as u32).to_le_bytes());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&binary)?;
    output.extend_from_slice(&encoder.finish()?);

    Ok(output)
}

/// 校验快照头部，返回版本号
pub fn snapshot_version(data: &[u8]) -> Result<[u8; 2], io::Error> {
    if data.len() < HEADER_LEN {
        return Err(invalid(format!("快照太短，无法解析: {} 字节", data.len())));
    }
    if !is_snapshot(data) {
        return Err(invalid("无效的快照格式：魔数不匹配"));
    }

    let offset = MAGIC_BYTES.len();
    let version = [data[offset], data[offset + 1]];
    if version[0] > SNAPSHOT_VERSION[0] {
        return Err(invalid(format!("不支持的快照版本: {}.{}", version[0], version[1])));
    }
    Ok(version)
}

/// 从压缩快照恢复对象
pub fn from_snapshot<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T, io::Error> {
    snapshot_version(data)?;

    let size_offset = MAGIC_BYTES.len() + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..size_offset + 4]);
    let original_size = u32::from_le_bytes(size_bytes) as usize;

    let mut decoder = GzDecoder::new(&data[HEADER_LEN..]);
    let mut binary = Vec::with_capacity(original_size);
    decoder.read_to_end(&mut binary)?;

    if binary.len() != original_size {
        return Err(invalid(format!(
            "解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
            original_size, binary.len()
        )));
    }

    bincode::serde::decode_from_slice(&binary, bincode::config::standard())
        .map(|(value, _)| value)
        .map_err(|e| invalid(format!("反序列化失败: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_foreign_data() {
        let err = snapshot_version(b"{\"articles\": []}").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(!is_snapshot(b"{}"));
    }

    #[test]
    fn rejects_newer_major_version() {
        let mut data = to_snapshot(&vec![1u32, 2, 3]).unwrap();
        data[MAGIC_BYTES.len()] = SNAPSHOT_VERSION[0] + 1;
        assert!(from_snapshot::<Vec<u32>>(&data).is_err());
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let data = to_snapshot(&vec!["egg".to_string(); 50]).unwrap();
        assert!(from_snapshot::<Vec<String>>(&data[..data.len() - 4]).is_err());
    }
}
