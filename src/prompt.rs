//! 交互式校验模块：
//! - `Ask` 抽象出“提问”能力，终端实现基于 dialoguer，测试中用脚本化应答替身
//! - 每个需要校验的参数都是一个小状态机：Pending -> Invalid -> ... -> Accepted / Aborted
//! - 目录缺失时询问是否创建，拒绝即中止整个命令

#[cfg(test)]
use std::collections::VecDeque;
use std::{
    fs,
    io::{self, BufRead, IsTerminal, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use crate::error::GenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromptKind {
    /// 自由输入
    Input,
    /// 是/否
    Confirm,
}

/// 提问能力。返回 `None` 表示输入流已关闭。
pub(crate) trait Ask {
    fn ask(&mut self, kind: PromptKind, message: &str) -> Result<Option<String>>;

    /// 要求输入一个值；输入流关闭视为意外错误
    fn input(&mut self, message: &str) -> Result<String> {
        match self.ask(PromptKind::Input, message)? {
            Some(v) => Ok(v.trim().to_string()),
            None => bail!("输入流已关闭，无法继续交互: {}", message),
        }
    }

    /// 是/否确认；输入流关闭视为“否”
    fn confirm(&mut self, message: &str) -> Result<bool> {
        Ok(self
            .ask(PromptKind::Confirm, message)?
            .map(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false))
    }
}

/// 终端实现：
/// - stdin 与 stderr 都是终端时用 dialoguer 交互
/// - 否则（管道、脚本）把提示写到 stderr，从输入流逐行读取
pub(crate) enum TerminalAsk<R> {
    Interactive(ColorfulTheme),
    Piped(R),
}

impl TerminalAsk<io::StdinLock<'static>> {
    pub(crate) fn stdin() -> Self {
        if io::stdin().is_terminal() && io::stderr().is_terminal() {
            Self::Interactive(ColorfulTheme::default())
        } else {
            Self::Piped(io::stdin().lock())
        }
    }
}

fn ask_interactive(theme: &ColorfulTheme, kind: PromptKind, message: &str) -> Result<Option<String>> {
    match kind {
        PromptKind::Input => {
            let value: String = Input::with_theme(theme)
                .with_prompt(message)
                .allow_empty(true)
                .interact_text()
                .context("读取输入失败")?;
            Ok(Some(value))
        }
        // Esc / q 视为“否”
        PromptKind::Confirm => {
            let answer = Confirm::with_theme(theme)
                .with_prompt(message)
                .default(false)
                .interact_opt()
                .context("读取确认失败")?;
            Ok(Some(if answer == Some(true) { "y" } else { "n" }.to_string()))
        }
    }
}

fn ask_piped(reader: &mut impl BufRead, kind: PromptKind, message: &str) -> Result<Option<String>> {
    let mut err = io::stderr();
    match kind {
        PromptKind::Input => write!(err, "❓ {} ", message)?,
        PromptKind::Confirm => write!(err, "❓ {} [y/N] ", message)?,
    }
    err.flush()?;
    let mut line = String::new();
    let n = reader.read_line(&mut line).context("读取输入失败")?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

impl<R: BufRead> Ask for TerminalAsk<R> {
    fn ask(&mut self, kind: PromptKind, message: &str) -> Result<Option<String>> {
        match self {
            Self::Interactive(theme) => ask_interactive(theme, kind, message),
            Self::Piped(reader) => ask_piped(reader, kind, message),
        }
    }
}

/// 脚本化应答，按顺序返回预置答案；答案用尽视为输入流关闭
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedAsk {
    answers: VecDeque<String>,
    pub(crate) asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedAsk {
    pub(crate) fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Ask for ScriptedAsk {
    fn ask(&mut self, _kind: PromptKind, message: &str) -> Result<Option<String>> {
        self.asked.push(message.to_string());
        Ok(self.answers.pop_front())
    }
}

/// 单个参数的校验状态
#[derive(Debug)]
pub(crate) enum FieldState<T> {
    Pending(String),
    Invalid { value: String, reason: String },
    Accepted(T),
    Aborted,
}

/// 一个提示点的文案
pub(crate) struct Hints<'a> {
    /// 值为空时的提示（仅必填项使用）
    pub(crate) empty: &'a str,
    /// 值不合法时的提示，`$value` 会替换为当前值
    pub(crate) invalid: &'a str,
    /// 重新输入时的提问
    pub(crate) input: &'a str,
}

fn drive<T>(
    ask: &mut dyn Ask,
    initial: String,
    hints: &Hints<'_>,
    mut step: impl FnMut(&mut dyn Ask, &str) -> Result<FieldState<T>>,
) -> Result<T> {
    let mut state = FieldState::Pending(initial);
    loop {
        state = match state {
            FieldState::Pending(value) => step(&mut *ask, &value)?,
            FieldState::Invalid { value, reason } => {
                let hint = if value.is_empty() {
                    hints.empty.to_string()
                } else {
                    hints.invalid.replace("$value", &value)
                };
                if reason.is_empty() {
                    eprintln!("❌ {}", hint);
                } else {
                    eprintln!("❌ {}（{}）", hint, reason);
                }
                FieldState::Pending(ask.input(hints.input)?)
            }
            FieldState::Accepted(v) => return Ok(v),
            FieldState::Aborted => return Err(GenError::Aborted.into()),
        };
    }
}

/// 必填项：空值或校验失败都要求重新输入
pub(crate) fn ensure_value<T>(
    ask: &mut dyn Ask,
    initial: &str,
    hints: &Hints<'_>,
    mut validate: impl FnMut(&str) -> std::result::Result<T, String>,
) -> Result<T> {
    drive(ask, initial.trim().to_string(), hints, |_ask, value| {
        if value.is_empty() {
            return Ok(FieldState::Invalid {
                value: String::new(),
                reason: String::new(),
            });
        }
        Ok(match validate(value) {
            Ok(v) => FieldState::Accepted(v),
            Err(reason) => FieldState::Invalid {
                value: value.to_string(),
                reason,
            },
        })
    })
}

/// 可选项：留空即接受“无”，否则必须通过校验
pub(crate) fn ensure_value_or_empty<T>(
    ask: &mut dyn Ask,
    initial: &str,
    hints: &Hints<'_>,
    mut validate: impl FnMut(&str) -> std::result::Result<T, String>,
) -> Result<Option<T>> {
    drive(ask, initial.trim().to_string(), hints, |_ask, value| {
        if value.is_empty() {
            return Ok(FieldState::Accepted(None));
        }
        Ok(match validate(value) {
            Ok(v) => FieldState::Accepted(Some(v)),
            Err(reason) => FieldState::Invalid {
                value: value.to_string(),
                reason,
            },
        })
    })
}

/// 确认目录存在；不存在时询问是否创建，拒绝则中止
fn ensure_dir_exists(ask: &mut dyn Ask, dir: &Path, what: &str) -> Result<bool> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(true);
    }
    eprintln!("⚠️ {} \"{}\" 不存在", what, dir.display());
    if ask.confirm("是否创建该目录？")? {
        fs::create_dir_all(dir).with_context(|| format!("创建目录失败: {}", dir.display()))?;
        println!("写入: {}", dir.display());
        Ok(true)
    } else {
        Ok(false)
    }
}

/// 必填目录：不存在时询问是否创建
pub(crate) fn ensure_directory(ask: &mut dyn Ask, initial: &str, hints: &Hints<'_>) -> Result<PathBuf> {
    drive(ask, initial.trim().to_string(), hints, |ask, value| {
        if value.is_empty() {
            return Ok(FieldState::Invalid {
                value: String::new(),
                reason: String::new(),
            });
        }
        let dir = PathBuf::from(value);
        Ok(if ensure_dir_exists(ask, &dir, "目录")? {
            FieldState::Accepted(dir)
        } else {
            FieldState::Aborted
        })
    })
}

/// 必填文件路径：其所在目录不存在时询问是否创建
pub(crate) fn ensure_filepath(
    ask: &mut dyn Ask,
    initial: &str,
    hints: &Hints<'_>,
    mut validate: impl FnMut(&str) -> std::result::Result<(), String>,
) -> Result<PathBuf> {
    drive(ask, initial.trim().to_string(), hints, |ask, value| {
        if value.is_empty() {
            return Ok(FieldState::Invalid {
                value: String::new(),
                reason: String::new(),
            });
        }
        if let Err(reason) = validate(value) {
            return Ok(FieldState::Invalid {
                value: value.to_string(),
                reason,
            });
        }
        let path = PathBuf::from(value);
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(if ensure_dir_exists(ask, &parent, "文件所在目录")? {
            FieldState::Accepted(path)
        } else {
            FieldState::Aborted
        })
    })
}

/// 目标文件已存在时询问是否覆盖；不存在直接返回 true
pub(crate) fn confirm_override(ask: &mut dyn Ask, path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    println!("ℹ️ {} 已存在", path.display());
    ask.confirm("是否覆盖？")
}
