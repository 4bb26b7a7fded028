// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Build automation and scripting tasks for Ergon
// Run with: cargo xtask <command>

use std::process::Command;
use std::time::Instant;

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const MAGENTA: &str = "\x1b[35m";

// Visual symbols
const CHECK: &str = "✓";
const CROSS: &str = "✗";
const GEAR: &str = "⚙";
const ROCKET: &str = "🚀";
const HAMMER: &str = "🔨";
const TEST_TUBE: &str = "🧪";
const TIMER: &str = "⏱";
const MAGNIFIER: &str = "🔍";
const BRUSH: &str = "🎨";
const CLIPPY: &str = "📎";
const PACKAGE: &str = "📦";

/// One cargo invocation with its presentation.
struct Step {
    name: &'static str,
    command: &'static str,
    emoji: &'static str,
    color: &'static str,
    info: &'static str,
    args: &'static [&'static str],
}

const BUILD: Step = Step {
    name: "Build",
    command: "build",
    emoji: HAMMER,
    color: BLUE,
    info: "Compiling all workspace crates in debug mode",
    args: &["build", "--workspace"],
};

const TEST: Step = Step {
    name: "Tests",
    command: "test",
    emoji: TEST_TUBE,
    color: GREEN,
    info: "Running unit tests, integration tests and doc tests",
    args: &["test", "--workspace"],
};

const BENCH: Step = Step {
    name: "Benchmarks",
    command: "bench",
    emoji: TIMER,
    color: MAGENTA,
    info: "Running the criterion benchmarks",
    args: &["bench", "--workspace"],
};

const CHECK_STEP: Step = Step {
    name: "Check",
    command: "check",
    emoji: MAGNIFIER,
    color: CYAN,
    info: "Checking code for errors without building executables",
    args: &["check", "--workspace"],
};

const FORMAT: Step = Step {
    name: "Format",
    command: "format",
    emoji: BRUSH,
    color: MAGENTA,
    info: "Formatting code using rustfmt with default settings",
    args: &["fmt", "--all"],
};

const CLIPPY_STEP: Step = Step {
    name: "Clippy",
    command: "clippy",
    emoji: CLIPPY,
    color: YELLOW,
    info: "Running Clippy linter with warnings as errors",
    args: &["clippy", "--workspace", "--", "-D", "warnings"],
};

const DEMO: Step = Step {
    name: "Demo",
    command: "demo",
    emoji: PACKAGE,
    color: BLUE,
    info: "Running the sandbox download-queue demo",
    args: &["run", "-p", "sandbox"],
};

// Every dispatchable step; help and `main` both read this list.
const COMMANDS: &[&Step] = &[
    &BUILD,
    &TEST,
    &BENCH,
    &CHECK_STEP,
    &FORMAT,
    &CLIPPY_STEP,
    &DEMO,
];

const PIPELINE: &[&Step] = &[&BUILD, &TEST, &CHECK_STEP, &FORMAT, &CLIPPY_STEP];

fn print_banner() {
    println!("{}{}", BOLD, CYAN);
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!(
        "║                      {} ERGON {}                        ║",
        ROCKET, GEAR
    );
    println!("║                 Task Pool Automation Tool                 ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!("{}", RESET);
}

fn print_help() {
    print_banner();
    println!("{}{}Usage:{} cargo xtask <command>\n", BOLD, YELLOW, RESET);
    println!("{}Available commands:{}", BOLD, RESET);
    for step in COMMANDS {
        println!(
            "  {} {}{}{:<7}{} - {}",
            step.emoji, step.color, BOLD, step.command, RESET, step.info
        );
    }
    println!(
        "  {} {}{}all{}     - Run the full pipeline",
        ROCKET, RED, BOLD, RESET
    );
}

fn print_task_start(task_name: &str, emoji: &str, color: &str) {
    println!(
        "\n{}{}━━━ {} {} {}━━━{}",
        BOLD, color, emoji, task_name, emoji, RESET
    );
}

fn print_success(message: &str) {
    println!("{}{} {} {}{}", BOLD, GREEN, CHECK, message, RESET);
}

fn print_error(message: &str) {
    println!("{}{} {} {}{}", BOLD, RED, CROSS, message, RESET);
}

fn print_command_info(cmd: &str, args: &[&str]) {
    let full_command = format!("{} {}", cmd, args.join(" "));
    println!("{}{}📋 Command:{} {}", BOLD, CYAN, RESET, full_command);
}

fn execute_command(cmd: &str, args: &[&str], task_name: &str) -> bool {
    let start_time = Instant::now();

    // Display the command that will be executed
    print_command_info(cmd, args);

    let mut command = Command::new(cmd);
    for arg in args {
        command.arg(arg);
    }

    // Use inherit to display output in real time
    let status = command.status();
    let duration = start_time.elapsed();

    match status {
        Ok(status) => {
            if status.success() {
                print_success(&format!(
                    "{} completed in {:.2}s",
                    task_name,
                    duration.as_secs_f64()
                ));
                true
            } else {
                print_error(&format!(
                    "{} failed after {:.2}s",
                    task_name,
                    duration.as_secs_f64()
                ));
                false
            }
        }
        Err(e) => {
            print_error(&format!("Failed to execute {}: {}", task_name, e));
            false
        }
    }
}

fn run_step(step: &Step) -> bool {
    print_task_start(step.name, step.emoji, step.color);
    println!("{}💡 Info:{} {}", BOLD, RESET, step.info);
    execute_command("cargo", step.args, step.name)
}

fn find_step(command: &str) -> Option<&'static Step> {
    COMMANDS.iter().find(|step| step.command == command).copied()
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "all" => all(),
        command => match find_step(command) {
            Some(step) => {
                run_step(step);
            }
            None => {
                print_error(&format!("Unknown command: {}", command));
                println!("\n{}", YELLOW);
                print_help();
            }
        },
    }
}

fn all() {
    print_banner();
    println!("{}{}Starting full build pipeline...{}", BOLD, CYAN, RESET);
    println!(
        "{}💡 Pipeline:{} This will run build → test → check → format → clippy",
        BOLD, RESET
    );

    let start_time = Instant::now();
    let mut success_count = 0;
    let total_tasks = PIPELINE.len();

    for (index, step) in PIPELINE.iter().enumerate() {
        println!(
            "\n{}{}[{}/{}] {} Phase{}",
            BOLD,
            step.color,
            index + 1,
            total_tasks,
            step.name,
            RESET
        );
        if run_step(step) {
            success_count += 1;
        }
    }

    let total_duration = start_time.elapsed();

    println!(
        "\n{}{}╔═══════════════════════════════════════╗{}",
        BOLD, CYAN, RESET
    );
    println!(
        "{}{}║            PIPELINE SUMMARY           ║{}",
        BOLD, CYAN, RESET
    );
    println!(
        "{}{}╚═══════════════════════════════════════╝{}",
        BOLD, CYAN, RESET
    );

    if success_count == total_tasks {
        println!(
            "{}{} {} All {} tasks completed successfully! {}{}",
            BOLD, GREEN, CHECK, total_tasks, ROCKET, RESET
        );
    } else {
        println!(
            "{}{} ⚠ {}/{} tasks completed{}",
            BOLD, YELLOW, success_count, total_tasks, RESET
        );
    }

    println!(
        "{}{}Total time: {:.2}s{}",
        BOLD,
        BLUE,
        total_duration.as_secs_f64(),
        RESET
    );
}
