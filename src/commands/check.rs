//! Check command implementation.
//!
//! Validates process table access and configuration.

use procdiff::process::{read_record, status_path, ProcessTableScanner};

use crate::config::{validate_effective_config, Config};

/// Validates process table access and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 procdiff - System Check");
    println!("==========================");

    let mut all_ok = true;
    let ctx = config.scan_context();

    // Check the process table directory
    println!("\n📁 Checking {}...", ctx.proc_root.display());
    match ProcessTableScanner::new(ctx.clone()).scan_with_stats() {
        Ok((snapshot, stats)) => {
            println!("   ✅ Process table accessible");
            if snapshot.is_empty() {
                println!("   ❌ No readable process records found");
                all_ok = false;
            } else {
                println!(
                    "   ✅ Read {} of {} process records ({} vanished, {} malformed)",
                    snapshot.len(),
                    stats.candidates,
                    stats.vanished,
                    stats.malformed
                );
            }
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    // Check our own status record
    println!("\n📄 Checking own status record...");
    let own_status = status_path(&ctx.proc_root, std::process::id());
    let mut buf = Vec::new();
    match read_record(&own_status, ctx.status_buffer_bytes, &mut buf) {
        Ok(record) => {
            println!(
                "   ✅ Parsed {}: pid={} ppid={} name={}",
                own_status.display(),
                record.pid(),
                record.ppid(),
                record.name()
            );
        }
        Err(e) => {
            println!("   ⚠️  {}", e);
        }
    }

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
