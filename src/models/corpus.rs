use phf::phf_map;

/// 语料库前缀表
///
/// 作者编号的前两个字符标识所属语料库，如 "lt0690" 属于拉丁语语料库
static CORPUS_PREFIXES: phf::Map<&'static str, Corpus> = phf_map! {
    "gr" => Corpus::Greek,
    "lt" => Corpus::Latin,
    "in" => Corpus::Inscriptions,
    "dp" => Corpus::Papyri,
    "ch" => Corpus::Christian,
};

/// 语料库枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Corpus {
    /// 希腊语文献
    Greek,
    /// 拉丁语文献
    Latin,
    /// 铭文
    Inscriptions,
    /// 纸草文书
    Papyri,
    /// 基督教铭文
    Christian,
}

impl Corpus {
    /// 获取语料库前缀
    pub fn prefix(self) -> &'static str {
        match self {
            Corpus::Greek => "gr",
            Corpus::Latin => "lt",
            Corpus::Inscriptions => "in",
            Corpus::Papyri => "dp",
            Corpus::Christian => "ch",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Corpus::Greek => "希腊语文献",
            Corpus::Latin => "拉丁语文献",
            Corpus::Inscriptions => "铭文",
            Corpus::Papyri => "纸草文书",
            Corpus::Christian => "基督教铭文",
        }
    }

    /// 从前缀解析语料库
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        CORPUS_PREFIXES.get(prefix).copied()
    }
}

impl std::fmt::Display for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
