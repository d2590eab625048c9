use std::io::{BufRead, Write};
use anyhow::{Context, Result};
use log::{info, warn};
use crate::core::exchange_graph::ExchangeRateGraph;
use crate::error::ParseError;
use crate::formatter;
use crate::parser::{self, Instruction};

pub const BANNER: &str = r#"
___  ___               __   ___  __  ___      __       ___  ___
 |  |__  |\ | \_/     |__) |__  /__`  |      |__)  /\   |  |__
 |  |___ | \| / \     |__) |___ .__/  |      |  \ /~~\  |  |___


This program allows user to:
1. input timestamped crypto currency price updates on various exchanges
2. query the best exchange rate between any two currencies based on the
   latest prices
assuming same currency can be transferred between exchanges at no cost

Price update input format:
<timestamp> <exchange> <source_currency> <destination_currency> <forward_factor> <backward_factor>
For example:
2017-11-01T09:42:23+00:00 KRAKEN BTC USD 1000.0 0.0009
signifies that a price update was received from Kraken on November 1, 2017 at 9:42:23 am
The update says that 1 BTC is worth 1000 USD and that 1 USD is worth 0.0009 BTC.

Exchange rate requests will be:
EXCHANGE_RATE_REQUEST <source_exchange> <source_currency> <destination_exchange> <destination_currency>
This represents the question: What is the best exchange rate for converting <source_currency> on
<source_exchange> into <destination_currency> on <destination_exchange>, and what trades and transfers
need to be made to achieve that rate?

For each exchange rate request, you will get a response as below:
BEST_RATES_BEGIN <source_exchange> <source_currency> <destination_exchange> <destination_currency> <rate>
<source_exchange> <source_currency>
<exchange1> <currency1> <conversion_rate from source_currency on source_exchange to currency1 on exchange1>
<exchange2> <currency2> <conversion_rate from currency1 on exchange1 to currency2 on exchange2>
...
<destination_exchange> <destination_currency>
BEST_RATES_END

Type "x" or "X" to exit the program
"#;

pub const ACK: &str = "Ack! Price update received";
pub const BYE: &str = "Bye!";
pub const INVALID_FACTORS: &str =
    "Product of forward_factor and backward_factor is greater than one, input discarded";
pub const UNRECOGNIZED: &str =
    "Input is not a price update or an exchange rate request, please try again";

/// 交互式控制台：逐行读取指令，维护汇率图并输出应答
pub struct Console<R, W> {
    reader: R,
    writer: W,
    graph: ExchangeRateGraph,
    show_banner: bool,
    prompt: String,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W, show_banner: bool, prompt: impl Into<String>) -> Self {
        Self {
            reader,
            writer,
            graph: ExchangeRateGraph::new(),
            show_banner,
            prompt: prompt.into(),
        }
    }

    pub fn graph(&self) -> &ExchangeRateGraph {
        &self.graph
    }

    /// 运行直到输入结束或收到退出命令
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            writeln!(self.writer, "{}", BANNER)?;
        }
        writeln!(self.writer, "{}\n\n", self.prompt)?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self.reader.read_line(&mut line).context("读取输入失败")?;
            if read == 0 {
                info!("输入结束");
                break;
            }
            let input = line.trim_end_matches(['\r', '\n']);
            if !self.handle_line(input)? {
                break;
            }
        }

        let (currency_count, edge_count) = self.graph.get_stats();
        info!("控制台退出，货币数量: {}, 汇率数量: {}", currency_count, edge_count);
        Ok(())
    }

    /// 处理一行输入，返回 false 表示退出
    pub fn handle_line(&mut self, input: &str) -> Result<bool> {
        match parser::parse_line(input) {
            Ok(Instruction::Exit) => {
                writeln!(self.writer, "{}", BYE)?;
                return Ok(false);
            }
            Ok(Instruction::ExchangeRateRequest(request)) => {
                let response = self.graph.get_best_rate(&request);
                writeln!(self.writer, "{}", formatter::format(&response))?;
            }
            Ok(Instruction::PriceUpdate(exchange_rates)) => {
                self.graph.add_or_update_exchange_rates(exchange_rates);
                writeln!(self.writer, "{}\n", ACK)?;
            }
            Err(ParseError::InvalidFactors(line)) => {
                warn!("丢弃无效价格更新: {}", line);
                writeln!(self.writer, "{}\n", INVALID_FACTORS)?;
            }
            Err(e) => {
                warn!("无法识别的输入: {}", e);
                writeln!(self.writer, "{}\n", UNRECOGNIZED)?;
            }
        }
        self.writer.flush()?;
        Ok(true)
    }
}
