fn main() -> anyhow::Result<()> {
    lotpulse_lib::run()
}
