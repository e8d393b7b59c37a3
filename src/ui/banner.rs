use colored::Colorize;

const ART: &str = r"
 _    _                 _____ _           _
| |  | |               |  ___(_)         | |
| |  | |___  ___ _ __  | |_   _ _ __   __| | ___ _ __
| |  | / __|/ _ \ '__| |  _| | | '_ \ / _` |/ _ \ '__|
| |__| \__ \  __/ |    | |   | | | | | (_| |  __/ |
 \____/|___/\___|_|    \_|   |_|_| |_|\__,_|\___|_|
";

pub fn render_banner() -> String {
    format!(
        "{}\n{}\n",
        ART.blue(),
        format!("UserFinder v{}", env!("CARGO_PKG_VERSION")).bold()
    )
}
