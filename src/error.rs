//! 错误分类与退出码：
//! - 配置格式错误：立即退出（-1）
//! - 用户主动取消：正常退出（0）
//! - 其它错误：打印完整错误链后退出（-2）
//!
//! 校验失败不会走到这里，它们在交互循环里被重新输入消化掉。

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum GenError {
    #[error("配置文件格式错误: {0}")]
    ConfigSchema(String),
    #[error("已取消")]
    Aborted,
}

pub(crate) const EXIT_OK: i32 = 0;
pub(crate) const EXIT_BAD_CONFIG: i32 = -1;
pub(crate) const EXIT_UNEXPECTED: i32 = -2;

/// 将命令执行结果映射为进程退出码，并输出对应提示
pub(crate) fn exit_code(result: anyhow::Result<()>) -> i32 {
    let err = match result {
        Ok(()) => return EXIT_OK,
        Err(e) => e,
    };
    match err.downcast_ref::<GenError>() {
        Some(GenError::Aborted) => {
            println!("ℹ️ 已取消，未做进一步修改");
            EXIT_OK
        }
        Some(e @ GenError::ConfigSchema(_)) => {
            eprintln!("❌ {}", e);
            EXIT_BAD_CONFIG
        }
        None => {
            eprintln!("❌ {:?}", err);
            eprintln!("❌ 程序遇到意外错误，请附上操作步骤提交 issue");
            EXIT_UNEXPECTED
        }
    }
}
