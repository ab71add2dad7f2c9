//! Detailed help with examples, shown by `--help-detailed`.

use console::style;

fn section(title: &str) {
    println!("\n{}", style(format!("## {title}")).yellow().bold());
}

fn param(name: &str) {
    println!("\n{}", style(name).green());
}

fn cmd(example: &str) {
    println!("{}", style(example).blue());
}

pub fn print_detailed() {
    println!("\n{}\n", style("codestash - project backup utility").cyan().bold());
    println!(
        "Creates compact backups of the projects under a directory by selectively\n\
         including essential development files (sources, configs, docs, build\n\
         manifests) while excluding regenerable or oversized files. Backups can\n\
         later be restored in full or per project."
    );

    section("Basic usage");
    cmd("codestash -p ~/projects -o backup.tar.gz");

    section("Selection options");

    param("Exclude directories or patterns");
    cmd("codestash -e logs temp");
    cmd("codestash -e '**/*.iml' scratch");
    println!("Bare names match a directory at any depth; glob patterns are used as-is.");

    param("Always include specific paths");
    println!("Explicit paths win over every exclusion, including the size limit:");
    cmd("codestash -i api/vendor project1/data/fixtures");

    param("Always exclude specific paths");
    cmd("codestash --exclude-path api/secrets");

    param("Project selection");
    cmd("codestash --include-projects api web");
    cmd("codestash --exclude-projects old_project sandbox");

    param("Maximum file size");
    cmd("codestash -m 50MB");
    println!("Supported units: B, KB, MB, GB, TB. Default: 20MB.");

    param("Virtualenv directories");
    println!("Excluded by default; include them with:");
    cmd("codestash -v");

    param("Module auto-detection");
    println!(
        "Directories containing __init__.py are swept into the backup by\n\
         default. Disable with:"
    );
    cmd("codestash --no-auto-modules");

    param("Compression");
    cmd("codestash -c 6");
    println!("Levels 0-9; 0 stores files without compression. Default: 9.");

    section("Profiles");
    println!("Save the current settings under a name and reuse them later:");
    cmd("codestash --create-profile daily -p ~/projects -o ~/backups -e logs temp");
    cmd("codestash --use-profile daily");
    println!("\nCreate a default profile covering all current projects:");
    cmd("codestash --create-default-profile -p ~/projects");
    println!("\nList saved profiles:");
    cmd("codestash --list-profiles");

    section("Dry run");
    println!("Walk and classify without writing an archive:");
    cmd("codestash --dry-run");

    section("Restore");
    cmd("codestash --restore backup.tar.gz --extract-dir ~/restored");
    println!("\nRestore only specific projects:");
    cmd("codestash --restore backup.tar.gz --extract-dir ~/restored --restore-projects api web");

    section("Logging");
    cmd("codestash --log-file backup.log --log-level debug");

    section("Post-backup actions");
    println!(
        "Run shell commands after a successful backup. {{backup_file}}, {{date}}\n\
         and {{time}} are substituted:"
    );
    cmd("codestash --post-action 'cp {backup_file} /mnt/backups/' --post-action 'echo done at {date} {time}'");

    section("Examples");

    param("Comprehensive backup");
    cmd("codestash -p ~/code -o ~/backups/code.tar.gz -v -m 30MB -c 9 \\");
    cmd("    -e logs temp -i api/vendor --include-projects api web \\");
    cmd("    --log-file backup.log --post-action 'echo saved {backup_file}'");

    param("Profile-driven daily backup");
    cmd("codestash --use-profile daily --dry-run");
    println!();
}
