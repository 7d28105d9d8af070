// ==========================================
// Bling 批量导入网关 - 上传令牌
// ==========================================
// 红线: 令牌只读、请求级生命周期、日志中禁止出现完整令牌
// ==========================================

use std::fmt;

/// 从 `Authorization: Bearer <token>` 提取的上游访问令牌
#[derive(Clone, PartialEq, Eq)]
pub struct UploadToken(String);

impl UploadToken {
    /// 由原始令牌构造（空白令牌视为缺失）
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// 解析 Authorization 头
    ///
    /// # 返回
    /// - Some(UploadToken): 方案为 Bearer 且令牌非空
    /// - None: 其他情况
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let mut parts = value.trim().splitn(2, ' ');
        let scheme = parts.next()?;
        if !scheme.eq_ignore_ascii_case("Bearer") {
            return None;
        }
        Self::new(parts.next()?)
    }

    /// 原始令牌（仅用于组装上游请求头）
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// 脱敏形式：只保留末尾 4 个字符
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for UploadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UploadToken({})", self.masked())
    }
}

impl fmt::Display for UploadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
