use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("postea")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Postea Contributors")
        .about("Browse saved pages and run AI shortcuts over them")
        .arg(clap::arg!(--server <URL> "Server URL override").global(true))
        .arg(clap::arg!(--settings <FILE> "Settings file override").global(true))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").global(true))
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .subcommand(
            clap::Command::new("pages")
                .about("Browse and mutate saved pages")
                .subcommand(clap::Command::new("list"))
                .subcommand(clap::Command::new("show").arg(clap::arg!(<ID>)).arg(clap::arg!(--full)))
                .subcommand(clap::Command::new("star").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("unstar").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("read-later").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("un-read-later").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("archive").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("save").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("remove").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("delete").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("mark-read").arg(clap::arg!(<IDS>...))),
        )
        .subcommand(clap::Command::new("sources").about("List subscribed sources"))
        .subcommand(clap::Command::new("collections").about("Show the collection tree"))
        .subcommand(clap::Command::new("shortcuts").about("List server content shortcuts"))
        .subcommand(
            clap::Command::new("run")
                .about("Run an AI shortcut and stream the output")
                .arg(clap::arg!(<SHORTCUT>))
                .arg(clap::arg!([INPUT]))
                .arg(clap::arg!(--model <MODEL>))
                .arg(clap::arg!(--language <LANG>))
                .arg(clap::arg!(--"page-id" <ID>))
                .arg(clap::arg!(--parser <PARSER>).value_parser(["readability", "density"])),
        )
        .subcommand(
            clap::Command::new("prompts")
                .about("Manage prompts")
                .subcommand(clap::Command::new("list"))
                .subcommand(clap::Command::new("enable").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("disable").arg(clap::arg!(<ID>)))
                .subcommand(clap::Command::new("add").arg(clap::arg!(<NAME>)).arg(clap::arg!(<CONTENT>))),
        )
        .subcommand(
            clap::Command::new("settings")
                .about("Read or change settings")
                .subcommand(clap::Command::new("get").arg(clap::arg!(<KEY>)))
                .subcommand(clap::Command::new("set").arg(clap::arg!(<KEY>)).arg(clap::arg!(<VALUE>)))
                .subcommand(clap::Command::new("path")),
        );

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "postea", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "postea", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "postea", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "postea", &completions_dir).unwrap();
}
