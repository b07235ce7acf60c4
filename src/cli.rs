//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 将 clap 的声明与业务逻辑解耦，便于在其它模块中复用参数。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 顶层 CLI 入口
#[derive(Parser, Debug)]
#[command(
    name = "react-gen",
    about = "React 组件 / 页面 / 图标生成器",
    version,
    after_help = "默认值从当前目录的 react-gen.config.json 读取"
)]
pub(crate) struct Cli {
    /// 配置文件路径，默认：react-gen.config.json
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
    /// 输出调试信息
    #[arg(long, global = true)]
    pub(crate) debug: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// 子命令定义
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// 生成 React 函数组件
    #[command(visible_alias = "c")]
    Component(ComponentArgs),
    /// 生成 React 页面
    #[command(visible_alias = "p")]
    Page(PageArgs),
    /// 优化 svg 资源并生成图标组件与 __icons 目录（已存在则覆盖）
    #[command(visible_alias = "i")]
    Icon(IconArgs),
    /// 移除组件（尚未实现）
    #[command(visible_alias = "r")]
    Remove,
    /// 写出示例配置文件
    Init {
        /// 强制覆盖已存在文件
        #[arg(long)]
        force: bool,
        /// 目标目录（默认当前目录）
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ComponentArgs {
    /// 组件名
    pub(crate) name: String,
    /// 输出目录
    #[arg(short = 'd', long = "outDir", value_name = "DIR")]
    pub(crate) out_dir: Option<String>,
    /// 组件的根元素，例如 div、button
    #[arg(short = 'b', long = "baseElement", value_name = "TAG")]
    pub(crate) base_element: Option<String>,
    /// 额外导出同名 typescript namespace
    #[arg(short = 'w', long = "wrapNamespace")]
    pub(crate) wrap_namespace: bool,
    /// 样式类型：scss|css|less|none
    #[arg(short = 's', long, value_name = "STYLE")]
    pub(crate) style: Option<String>,
    /// 样式文件名（不含扩展名），`$component` 会被替换为组件名
    #[arg(long = "styleFilename", value_name = "PATTERN")]
    pub(crate) style_filename: Option<String>,
    /// 使用 React.forwardRef
    #[arg(short = 'f', long = "forwardRef")]
    pub(crate) forward_ref: bool,
    /// 追加 re-export 的 index 文件
    #[arg(short = 'i', long = "indexPath", value_name = "FILE")]
    pub(crate) index_path: Option<String>,
    /// 文件头注释中的作者
    #[arg(short = 'a', long, value_name = "AUTHOR")]
    pub(crate) author: Option<String>,
    /// 文件头注释中的描述（仅命令行）
    #[arg(short = 'e', long, value_name = "TEXT")]
    pub(crate) descrip: Option<String>,
    /// 在文件头注释中标记创建日期
    #[arg(short = 't', long)]
    pub(crate) time: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PageArgs {
    /// 页面名
    pub(crate) name: String,
    /// 输出目录
    #[arg(short = 'd', long = "outDir", value_name = "DIR")]
    pub(crate) out_dir: Option<String>,
    /// 样式类型：scss|css|less|none
    #[arg(short = 's', long, value_name = "STYLE")]
    pub(crate) style: Option<String>,
    /// 样式文件名（不含扩展名），`$component` 会被替换为页面名
    #[arg(long = "styleFilename", value_name = "PATTERN")]
    pub(crate) style_filename: Option<String>,
    /// 文件头注释中的作者
    #[arg(short = 'a', long, value_name = "AUTHOR")]
    pub(crate) author: Option<String>,
    /// 文件头注释中的描述（仅命令行）
    #[arg(short = 'e', long, value_name = "TEXT")]
    pub(crate) descrip: Option<String>,
    /// 在文件头注释中标记创建日期
    #[arg(short = 't', long)]
    pub(crate) time: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct IconArgs {
    /// 图标组件文件路径，组件名取自文件名；省略时使用配置中的 icon.outFilepath
    #[arg(value_name = "OUT_FILEPATH")]
    pub(crate) out_filepath: Option<String>,
    /// 查找 svg 的目录
    #[arg(short = 'd', long = "assetDirs", value_name = "DIR", num_args = 1..)]
    pub(crate) asset_dirs: Vec<String>,
    /// 递归查找子目录
    #[arg(short = 'r', long)]
    pub(crate) recursive: bool,
    /// 额外导出单色版本（通过 CSS color 着色）
    #[arg(short = 'm', long)]
    pub(crate) monocolor: bool,
    /// 统一图标尺寸，例如 6.4rem-6.4rem、96px-4.8rem
    #[arg(short = 'n', long, value_name = "SIZE")]
    pub(crate) normalize: Option<String>,
    /// 文件头注释中的描述
    #[arg(short = 'e', long, value_name = "TEXT")]
    pub(crate) descrip: Option<String>,
    /// 在文件头注释中标记创建日期
    #[arg(short = 't', long)]
    pub(crate) time: bool,
    /// 追加 re-export 的 index 文件
    #[arg(short = 'i', long = "indexPath", value_name = "FILE")]
    pub(crate) index_path: Option<String>,
    /// 启用懒加载的优化后体积阈值（字节），省略时全部懒加载
    #[arg(long, value_name = "BYTES")]
    pub(crate) threshold: Option<String>,
    /// 额外导出同名 typescript namespace
    #[arg(short = 'w', long = "wrapNamespace")]
    pub(crate) wrap_namespace: bool,
    /// 普通图标名前缀
    #[arg(long = "prefixNormal", value_name = "PREFIX")]
    pub(crate) prefix_normal: Option<String>,
    /// 普通图标名后缀
    #[arg(long = "suffixNormal", value_name = "SUFFIX")]
    pub(crate) suffix_normal: Option<String>,
    /// 单色图标名前缀
    #[arg(long = "prefixSingleColor", value_name = "PREFIX")]
    pub(crate) prefix_single_color: Option<String>,
    /// 单色图标名后缀，默认 _mono
    #[arg(long = "suffixSingleColor", value_name = "SUFFIX")]
    pub(crate) suffix_single_color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_icon_command_with_camel_case_flags() {
        let cli = Cli::try_parse_from([
            "react-gen",
            "icon",
            "src/Icons.tsx",
            "--assetDirs",
            "a",
            "b",
            "--normalize",
            "96px-4.8rem",
            "--threshold",
            "512",
            "-m",
        ])
        .unwrap();
        match cli.command {
            Command::Icon(args) => {
                assert_eq!(args.out_filepath.as_deref(), Some("src/Icons.tsx"));
                assert_eq!(args.asset_dirs, vec!["a", "b"]);
                assert_eq!(args.normalize.as_deref(), Some("96px-4.8rem"));
                assert_eq!(args.threshold.as_deref(), Some("512"));
                assert!(args.monocolor);
                assert!(!args.recursive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn component_alias_and_global_flags() {
        let cli = Cli::try_parse_from([
            "react-gen", "c", "myButton", "--outDir", "src", "-f", "--debug",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Command::Component(args) => {
                assert_eq!(args.name, "myButton");
                assert_eq!(args.out_dir.as_deref(), Some("src"));
                assert!(args.forward_ref);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
