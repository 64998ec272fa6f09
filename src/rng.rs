//! 确定性随机数（xorshift64*）
//!
//! 相同种子产生相同序列；每条工作链持有自己的流，执行顺序不影响结果。

/// xorshift64* 随机数发生器
#[derive(Debug, Clone)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        // xorshift 状态不能为 0
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// `[0, bound)` 内的均匀整数；`bound == 0` 时返回 0。
    pub fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        ((self.next_u64() as u128 * bound as u128) >> 64) as u64
    }

    /// 派生一个独立的子流
    pub fn fork(&mut self) -> SimRng {
        SimRng::new(self.next_u64())
    }
}
