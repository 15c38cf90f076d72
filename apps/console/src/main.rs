fn main() -> anyhow::Result<()> {
    matchroom_console::run()
}
