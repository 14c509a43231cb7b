//! 作者与作品编号
//!
//! 作者编号是六位字符（前两位是语料库前缀），作品编号是三位字符，
//! 两者拼成 "lt0690w001" 形式的全局编号。
//! 编号藏在自动补全候选值的末尾定宽区块里，这里统一做类型化提取

use regex::Regex;

use crate::models::corpus::Corpus;

/// 作者编号（六位，如 "lt0690"）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorId(String);

impl AuthorId {
    /// 解析作者编号
    ///
    /// 要求恰好六位、前缀是已知语料库、其余为字母数字
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() != 6 {
            return None;
        }
        Corpus::from_prefix(&raw[..2])?;
        if !raw[2..].chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// 从补全候选值中提取作者编号
    ///
    /// 候选值形如 "Vergilius Maro, P. (Vergil) [lt0690]"，编号在末尾的方括号里
    pub fn from_hint_value(value: &str) -> Option<Self> {
        let re = Regex::new(r"\[([a-z]{2}[a-zA-Z0-9]{4})\]$").ok()?;
        let caps = re.captures(value.trim())?;
        Self::parse(caps.get(1)?.as_str())
    }

    /// 所属语料库
    pub fn corpus(&self) -> Option<Corpus> {
        Corpus::from_prefix(&self.0[..2])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 拼接成 "lt0690w001" 形式的全局作品编号
    pub fn universal_id(&self, work: &WorkId) -> String {
        format!("{}w{}", self.0, work.as_str())
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 作品编号（三位，如 "001"）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkId(String);

impl WorkId {
    /// 解析作品编号
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() != 3 {
            return None;
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// 从作品候选值中提取作品编号
    ///
    /// 候选值形如 "Aeneis (001)"，编号在末尾的圆括号里
    pub fn from_hint_value(value: &str) -> Option<Self> {
        let re = Regex::new(r"\(([a-zA-Z0-9]{3})\)$").ok()?;
        let caps = re.captures(value.trim())?;
        Self::parse(caps.get(1)?.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_id_from_hint_value() {
        let hint = "Vergilius Maro, P. (Vergil) [lt0690]";
        let author = AuthorId::from_hint_value(hint).unwrap();
        assert_eq!(author.as_str(), "lt0690");
        assert_eq!(author.corpus(), Some(Corpus::Latin));
    }

    #[test]
    fn test_author_id_rejects_bad_prefix() {
        assert!(AuthorId::parse("xx0690").is_none());
        assert!(AuthorId::parse("lt069").is_none());
        assert!(AuthorId::from_hint_value("没有编号的候选值").is_none());
    }

    #[test]
    fn test_work_id_from_hint_value() {
        let work = WorkId::from_hint_value("Aeneis (001)").unwrap();
        assert_eq!(work.as_str(), "001");
        // 服务器在出错时会塞一行提示文本进候选列表，必须解析不出编号
        assert!(WorkId::from_hint_value("somehow failed to find any works: try picking the author again").is_none());
    }

    #[test]
    fn test_universal_id() {
        let author = AuthorId::parse("gr0008").unwrap();
        let work = WorkId::parse("001").unwrap();
        assert_eq!(author.universal_id(&work), "gr0008w001");
    }
}
