fn main() {
    click_chess::terminal::run_interactive_terminal();
}
