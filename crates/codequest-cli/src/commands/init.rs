//! The `codequest init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("codequest.toml").exists() {
        println!("codequest.toml already exists, skipping.");
    } else {
        std::fs::write("codequest.toml", SAMPLE_CONFIG)?;
        println!("Created codequest.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: codequest validate --bank question-banks/example.toml");
    println!("  2. Set question_bank in codequest.toml to use your own questions");
    println!("  3. Run: codequest student create --name <name>");
    println!("  4. Run: codequest play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# codequest configuration

# Roster (students.json) and attempt ledger (attempts.csv) live here.
data_dir = "./data"

# Uncomment to replace the built-in questions. A file or a directory.
# question_bank = "question-banks"

# Teacher reports are written to data_dir unless this is set.
# report_dir = "./reports"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Question Bank"
description = "One starter question per topic"

[[questions]]
id = "EX-V1"
topic = "Variables"
difficulty = 1
type = "predict"
prompt = """
What will this print?

name = "Ada"
print(name)"""
answer = "Ada"
explanation = "print shows the value stored in name."

[[questions]]
id = "EX-C1"
topic = "Conditionals"
difficulty = 1
type = "predict"
prompt = """
What will this print?

if 1 > 2:
    print("big")
else:
    print("small")"""
answer = "small"
explanation = "1 is not greater than 2, so the else branch runs."

[[questions]]
id = "EX-L1"
topic = "Loops"
difficulty = 1
type = "predict"
prompt = """
What will this print?

for i in range(2):
    print(i * 2)"""
answer = """
0
2"""
explanation = "range(2) yields 0 and 1, each doubled."

[[questions]]
id = "EX-F1"
topic = "Functions"
difficulty = 2
type = "fill"
prompt = """
Fill the blank so double(4) returns 8:
def double(n):
    return __"""
answer = "n * 2"
explanation = "Multiply the argument by two and return it."
"#;
