//! bootstrap-token 主程序入口
//!
//! 设计原则：
//! - 模块化：入口代码简洁，逻辑委托给各模块
//! - 安静模式：默认无输出，子进程的输出原样透传
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换

use bootstrap_token::cli::{self, Cli, Commands};
use bootstrap_token::utils::env_plan::EnvMap;
use bootstrap_token::utils::paths;
use bootstrap_token::{Config, Launcher, OutputFormat, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load(cli.config.as_deref(), cli.verbose) {
        Ok(cfg) => cfg,
        Err(e) => {
            e.report(cli.verbose);
            std::process::exit(e.exit_code());
        }
    };

    let command = cli.command.unwrap_or_else(Commands::default_run);

    match run_command(command, config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            e.report(cli.verbose);
            std::process::exit(e.exit_code());
        }
    }
}

/// 初始化日志：输出到 stderr，RUST_LOG 优先
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 运行具体命令，返回进程退出码
fn run_command(command: Commands, mut config: Config) -> Result<i32> {
    let inherited = paths::current_env();

    match command {
        Commands::Run { strict, args } => {
            config.strict |= strict;
            let launcher = Launcher::from_config(&config);
            launcher.launch(&inherited, &args)
        }

        Commands::Env { format, all } => {
            let launcher = Launcher::from_config(&config);
            print_env(&launcher, &inherited, cli::parse_format(&format), all)?;
            Ok(0)
        }

        Commands::Doctor => {
            let launcher = Launcher::from_config(&config);
            diagnose(&launcher, &config, &inherited);
            Ok(0)
        }
    }
}

/// 打印将传给目标程序的环境
///
/// 非 UTF-8 的值按有损方式显示，子进程仍收到原始字节。
fn print_env(
    launcher: &Launcher,
    inherited: &EnvMap,
    format: OutputFormat,
    all: bool,
) -> Result<()> {
    let plan = launcher.plan(inherited);

    if all {
        let env = plan.apply(inherited);
        match format {
            OutputFormat::Env => {
                for (key, value) in &env {
                    println!("{}={}", key.to_string_lossy(), value.to_string_lossy());
                }
            }
            OutputFormat::Json => {
                let lossy: BTreeMap<String, String> = env
                    .iter()
                    .map(|(k, v)| {
                        (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned())
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&lossy)?);
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Env => {
            if !plan.activated {
                println!(
                    "# 激活脚本不存在，未应用激活改动: {}",
                    launcher.activation().script().display()
                );
            }
            for a in &plan.assignments {
                println!("{}={}", a.key, a.value.to_string_lossy());
            }
            for key in &plan.removals {
                println!("# unset {}", key);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }

    Ok(())
}

/// 诊断布局中引用的路径
fn diagnose(launcher: &Launcher, config: &Config, inherited: &EnvMap) {
    println!("🔍 启动环境诊断\n");

    match &config.source {
        Some(path) => println!("布局文件: {}", path.display()),
        None => println!("布局文件: 未找到，使用内置布局"),
    }
    println!("严格模式: {}\n", if launcher.is_strict() { "开启" } else { "关闭" });

    let layout = launcher.layout();
    let activation = launcher.activation();
    let mut issues = 0;

    let dirs = [
        ("MY_BASE", layout.my_base.clone()),
        ("PYTHON_BASE", layout.python_base.clone()),
        ("LD_LIBRARY_PATH", layout.library_path()),
        ("PYTHONPATH (warehouse)", layout.warehouse_path.clone()),
        ("PYTHONPATH (site-packages)", layout.site_packages.clone()),
    ];

    for (label, dir) in &dirs {
        if paths::dir_exists(Path::new(dir)) {
            println!("✓ {}: {}", label, dir);
        } else {
            println!("⚠️  {} 目录不存在: {}", label, dir);
            issues += 1;
        }
    }

    let conf = layout.django_conf();
    if paths::file_exists(Path::new(&conf)) {
        println!("✓ DJANGO_CONF: {}", conf);
    } else {
        println!("⚠️  DJANGO_CONF 文件不存在: {}", conf);
        issues += 1;
    }

    if activation.is_available() {
        println!("✓ 激活脚本: {}", activation.script().display());
    } else {
        println!("⚠️  激活脚本不存在: {}", activation.script().display());
        println!("   默认模式下仍会继续启动，但不设置 VIRTUAL_ENV，PATH 与 PYTHONHOME 保持原样");
        println!("   使用 --strict 在启动前中止");
        issues += 1;
    }

    let child_env = launcher.child_environment(inherited);
    match launcher.resolve_program(&child_env) {
        Some(path) => println!("✓ 目标程序: {}", path.display()),
        None => {
            println!("❌ 目标程序不可执行或不存在: {}", layout.program);
            issues += 1;
        }
    }

    if issues == 0 {
        println!("\n✅ 未发现明显问题");
    } else {
        println!("\n发现 {} 个问题", issues);
        if !config.verbose {
            println!("提示：使用 --verbose 查看详细日志");
        }
    }
}
