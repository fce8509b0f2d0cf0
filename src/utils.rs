/// Small shared helpers / 工具函数

/// 根据指定编码解码压缩包内的文件名
pub fn decode_filename(raw_name: &[u8], encoding: &str) -> String {
    // 先尝试 UTF-8
    if let Ok(s) = std::str::from_utf8(raw_name) {
        // 如果是有效 UTF-8 且用户没有强制指定其他编码，直接返回
        if encoding.is_empty() || encoding.eq_ignore_ascii_case("utf-8") {
            return s.to_string();
        }
    }

    // 根据用户指定的编码解码
    let decoder = match encoding.to_lowercase().as_str() {
        "gbk" => encoding_rs::GBK,
        "gb2312" => encoding_rs::GB18030, // GB2312 是 GB18030 的子集
        "gb18030" => encoding_rs::GB18030,
        "big5" => encoding_rs::BIG5,
        "shift_jis" | "shift-jis" => encoding_rs::SHIFT_JIS,
        "euc-kr" | "euc_kr" => encoding_rs::EUC_KR,
        _ => encoding_rs::UTF_8,
    };

    let (decoded, _, _) = decoder.decode(raw_name);
    decoded.to_string()
}

/// Truncate to at most `max_chars` characters, on a char boundary / 按字符数截断
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
