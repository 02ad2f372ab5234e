use crate::constants::{self, config_key, section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// YAML 配置文件的完整结构
/// 使用 BTreeMap 保持键的有序性
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct YamlConfig {
    /// zerotier-cli 路径、auth token 位置、Central 地址
    #[serde(default)]
    pub zerotier: BTreeMap<String, String>,

    /// ip 命令与提权命令
    #[serde(default)]
    pub system: BTreeMap<String, String>,

    #[serde(default)]
    pub log: BTreeMap<String, String>,

    /// 捕获未知的顶级键，保证不丢失任何配置
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl YamlConfig {
    /// 获取数据根目录: ~/.ztui/
    pub fn data_dir() -> PathBuf {
        // 优先使用环境变量指定的数据路径
        if let Ok(path) = std::env::var(constants::DATA_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(constants::DATA_DIR)
    }

    /// 获取配置文件路径: ~/.ztui/config.yaml
    fn config_path() -> PathBuf {
        Self::data_dir().join(constants::CONFIG_FILE)
    }

    /// 从配置文件加载
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            // 配置文件不存在，创建默认配置
            let config = Self::default_config();
            config.save();
            return config;
        }

        let content = fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("[ERROR] failed to read config: {}, path: {:?}", e, path);
            String::new()
        });

        Self::from_yaml(&content).unwrap_or_else(|e| {
            eprintln!("[ERROR] failed to parse config: {}, path: {:?}", e, path);
            Self::default_config()
        })
    }

    /// 解析 YAML 文本，缺失的 key 用默认值补齐
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default_config());
        }
        let mut config: Self = serde_yaml::from_str(content)?;
        config.fill_defaults();
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self) {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                eprintln!("[ERROR] failed to create config dir: {}", e);
            });
        }

        let content = serde_yaml::to_string(self).unwrap_or_else(|e| {
            eprintln!("[ERROR] failed to serialize config: {}", e);
            String::new()
        });

        fs::write(&path, content).unwrap_or_else(|e| {
            eprintln!("[ERROR] failed to save config: {}, path: {:?}", e, path);
        });
    }

    /// 创建默认配置
    pub fn default_config() -> Self {
        let mut config = Self::default();
        config.fill_defaults();
        config
    }

    /// 只补齐缺失的 key，不覆盖用户已有的值
    fn fill_defaults(&mut self) {
        let defaults: &[(&str, &str, &str)] = &[
            (section::ZEROTIER, config_key::CLI, constants::DEFAULT_CLI),
            (
                section::ZEROTIER,
                config_key::AUTH_SECRET,
                constants::DEFAULT_AUTH_SECRET,
            ),
            (
                section::ZEROTIER,
                config_key::CENTRAL_URL,
                constants::DEFAULT_CENTRAL_URL,
            ),
            (section::SYSTEM, config_key::IP, constants::DEFAULT_IP),
            (section::SYSTEM, config_key::ESCALATE, constants::DEFAULT_ESCALATE),
            (section::LOG, config_key::MODE, config_key::CONCISE),
        ];
        for (part, key, value) in defaults {
            if let Some(map) = self.get_section_mut(part) {
                map.entry(key.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
    }

    /// 是否是 verbose 模式
    pub fn is_verbose(&self) -> bool {
        self.log
            .get(config_key::MODE)
            .is_some_and(|m| m == config_key::VERBOSE)
    }

    // ========== 常用字段 ==========

    /// zerotier-cli 可执行文件
    pub fn cli_program(&self) -> &str {
        self.value_or(section::ZEROTIER, config_key::CLI, constants::DEFAULT_CLI)
    }

    pub fn auth_secret(&self) -> &str {
        self.value_or(
            section::ZEROTIER,
            config_key::AUTH_SECRET,
            constants::DEFAULT_AUTH_SECRET,
        )
    }

    pub fn central_url(&self) -> &str {
        self.value_or(
            section::ZEROTIER,
            config_key::CENTRAL_URL,
            constants::DEFAULT_CENTRAL_URL,
        )
    }

    pub fn ip_program(&self) -> &str {
        self.value_or(section::SYSTEM, config_key::IP, constants::DEFAULT_IP)
    }

    /// 提权命令（pkexec / sudo 等）
    pub fn escalate_program(&self) -> &str {
        self.value_or(
            section::SYSTEM,
            config_key::ESCALATE,
            constants::DEFAULT_ESCALATE,
        )
    }

    fn value_or<'a>(&'a self, section: &str, key: &str, fallback: &'a str) -> &'a str {
        self.get_property(section, key)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(fallback)
    }

    // ========== 根据 section 名称获取对应的 map ==========

    /// 获取指定 section 的不可变引用
    pub fn get_section(&self, section: &str) -> Option<&BTreeMap<String, String>> {
        match section {
            section::ZEROTIER => Some(&self.zerotier),
            section::SYSTEM => Some(&self.system),
            section::LOG => Some(&self.log),
            _ => None,
        }
    }

    /// 获取指定 section 的可变引用
    pub fn get_section_mut(&mut self, section: &str) -> Option<&mut BTreeMap<String, String>> {
        match section {
            section::ZEROTIER => Some(&mut self.zerotier),
            section::SYSTEM => Some(&mut self.system),
            section::LOG => Some(&mut self.log),
            _ => None,
        }
    }

    /// 获取某个 section 中指定 key 的值
    pub fn get_property(&self, section: &str, key: &str) -> Option<&String> {
        self.get_section(section).and_then(|m| m.get(key))
    }

    /// 设置某个 section 中的键值对（不落盘）
    pub fn put_property(&mut self, section: &str, key: &str, value: &str) -> bool {
        match self.get_section_mut(section) {
            Some(map) => {
                map.insert(key.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    /// 设置某个 section 中的键值对并保存
    pub fn set_property(&mut self, section: &str, key: &str, value: &str) {
        if self.put_property(section, key, value) {
            self.save();
        }
    }

    /// 获取所有已知的 section 名称
    pub fn all_section_names(&self) -> &'static [&'static str] {
        constants::ALL_SECTIONS
    }
}
